//! `wgpu::VertexBufferLayout` describing the packed [`ChunkVertex`] record,
//! so a renderer can bind either output buffer directly.
//!
//! | Location | Offset | Format    | Field        |
//! |----------|--------|-----------|--------------|
//! | 0        | 0      | Float32x3 | position     |
//! | 1        | 12     | Float32x2 | uv           |
//! | 2        | 20     | Float32x4 | atlas bounds |
//! | 3        | 36     | Float32x3 | tint         |

use std::mem;

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::packed::ChunkVertex;

pub const CHUNK_VERTEX_ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: mem::offset_of!(ChunkVertex, position) as u64,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: mem::offset_of!(ChunkVertex, uv) as u64,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x4,
        offset: mem::offset_of!(ChunkVertex, atlas_bounds) as u64,
        shader_location: 2,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: mem::offset_of!(ChunkVertex, tint) as u64,
        shader_location: 3,
    },
];

/// Layout shared by the opaque and translucent chunk pipelines.
pub const CHUNK_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<ChunkVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &CHUNK_VERTEX_ATTRIBUTES,
};

pub fn chunk_vertex_buffer_layout() -> VertexBufferLayout<'static> {
    CHUNK_VERTEX_LAYOUT
}

// ---------------------------------------------------------------------------
// Compile-time validation
// ---------------------------------------------------------------------------

const _: () = assert!(mem::size_of::<ChunkVertex>() == 48, "ChunkVertex must stay 48 bytes");
const _: () = assert!(CHUNK_VERTEX_ATTRIBUTES[1].offset == 12);
const _: () = assert!(CHUNK_VERTEX_ATTRIBUTES[2].offset == 20);
const _: () = assert!(CHUNK_VERTEX_ATTRIBUTES[3].offset == 36);
const _: () = assert!(
    CHUNK_VERTEX_ATTRIBUTES[3].offset + 12 == mem::size_of::<ChunkVertex>() as u64,
    "tint must end the record"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_stride_matches_vertex_struct_size() {
        assert_eq!(CHUNK_VERTEX_LAYOUT.array_stride, 48);
    }

    #[test]
    fn test_attributes_tile_the_record() {
        let mut expected_offset = 0;
        for attr in CHUNK_VERTEX_ATTRIBUTES.iter() {
            assert_eq!(attr.offset, expected_offset);
            expected_offset += attr.format.size();
        }
        assert_eq!(expected_offset, CHUNK_VERTEX_LAYOUT.array_stride);
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        for (i, attr) in CHUNK_VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }

    #[test]
    fn test_helper_returns_same_layout() {
        let layout = chunk_vertex_buffer_layout();
        assert_eq!(layout.array_stride, CHUNK_VERTEX_LAYOUT.array_stride);
        assert_eq!(layout.attributes.len(), 4);
    }

    #[test]
    fn test_layout_is_valid_for_wgpu_pipeline() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            force_fallback_adapter: true,
            ..Default::default()
        }));

        // Headless machines without any adapter skip this check.
        let Ok(adapter) = adapter else {
            return;
        };

        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
                .expect("failed to create device");

        let shader_source = r#"
            struct VsOut {
                @builtin(position) clip: vec4<f32>,
                @location(0) uv: vec2<f32>,
                @location(1) @interpolate(flat) bounds: vec4<f32>,
                @location(2) tint: vec3<f32>,
            }

            @vertex
            fn vs_main(
                @location(0) position: vec3<f32>,
                @location(1) uv: vec2<f32>,
                @location(2) bounds: vec4<f32>,
                @location(3) tint: vec3<f32>,
            ) -> VsOut {
                var out: VsOut;
                out.clip = vec4<f32>(position, 1.0);
                out.uv = uv;
                out.bounds = bounds;
                out.tint = tint;
                return out;
            }

            @fragment
            fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
                let atlas_uv = mix(in.bounds.xy, in.bounds.zw, fract(in.uv));
                return vec4<f32>(in.tint * atlas_uv.x, 1.0);
            }
        "#;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test_chunk_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let _pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("test_chunk_pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[CHUNK_VERTEX_LAYOUT],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
    }
}
