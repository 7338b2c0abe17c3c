//! Output vertex record and its encoder.
//!
//! Every vertex written by the mesher is a [`ChunkVertex`]: twelve native-endian
//! `f32` values, 48 bytes, laid out as
//!
//!   - `[0..12]`  position `[f32; 3]`, world space within the chunk column
//!   - `[12..20]` uv `[f32; 2]`, coordinate inside the texture
//!   - `[20..36]` atlas bounds `[f32; 4]`, `(u0, v0, u1, v1)` of the texture
//!   - `[36..48]` tint `[f32; 3]`, already multiplied by face shading

use crate::block_mesh::BlockMeshVertex;
use crate::resource_pack::TextureBounds;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChunkVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub atlas_bounds: [f32; 4],
    pub tint: [f32; 3],
}

static_assertions::assert_eq_size!(ChunkVertex, [u8; 48]);

/// Size of one encoded vertex in bytes.
pub const VERTEX_STRIDE: usize = std::mem::size_of::<ChunkVertex>();

/// Number of `f32` fields in one encoded vertex.
pub const VERTEX_FLOATS: usize = VERTEX_STRIDE / std::mem::size_of::<f32>();

impl ChunkVertex {
    /// The vertex as raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// The vertex as its twelve float fields, in layout order.
    pub fn to_floats(&self) -> [f32; VERTEX_FLOATS] {
        bytemuck::cast(*self)
    }
}

/// Encodes one block-mesh vertex placed at `offset` with the given atlas
/// rectangle and face shading.
///
/// No rounding is applied; every field keeps full `f32` precision.
#[inline]
pub fn encode_vertex(
    vertex: &BlockMeshVertex,
    offset: [f32; 3],
    bounds: TextureBounds,
    shading: f32,
) -> ChunkVertex {
    let (u0, v0, u1, v1) = bounds;
    ChunkVertex {
        position: [
            vertex.coord[0] + offset[0],
            vertex.coord[1] + offset[1],
            vertex.coord[2] + offset[2],
        ],
        uv: vertex.texture_coord,
        atlas_bounds: [u0, v0, u1, v1],
        tint: [
            vertex.tint[0] * shading,
            vertex.tint[1] * shading,
            vertex.tint[2] * shading,
        ],
    }
}

/// Decodes a buffer of packed vertices.
///
/// Trailing bytes that do not form a whole record are ignored.
pub fn decode_vertices(bytes: &[u8]) -> Vec<ChunkVertex> {
    bytes
        .chunks_exact(VERTEX_STRIDE)
        .map(bytemuck::pod_read_unaligned::<ChunkVertex>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_vertex_size_is_48_bytes() {
        assert_eq!(VERTEX_STRIDE, 48);
        assert_eq!(VERTEX_FLOATS, 12);
    }

    #[test]
    fn test_field_order() {
        let vertex = BlockMeshVertex::new([0.25, 0.5, 0.75], [0.1, 0.9], [1.0, 0.5, 0.2]);
        let encoded = encode_vertex(&vertex, [3.0, 32.0, 7.0], (0.0, 0.25, 0.5, 0.75), 0.5);
        assert_eq!(
            encoded.to_floats(),
            [
                3.25, 32.5, 7.75, // position
                0.1, 0.9, // uv
                0.0, 0.25, 0.5, 0.75, // atlas
                0.5, 0.25, 0.1, // tint * shading
            ]
        );
    }

    #[test]
    fn test_bytes_are_native_endian_floats() {
        let vertex = BlockMeshVertex::new([1.0, 2.0, 3.0], [0.0, 1.0], [1.0; 3]);
        let encoded = encode_vertex(&vertex, [0.0; 3], (0.0, 0.0, 1.0, 1.0), 1.0);
        let bytes = encoded.as_bytes();
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[4..8], &2.0f32.to_ne_bytes());
        assert_eq!(&bytes[44..48], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn test_decode_unaligned_buffer() {
        let vertex = BlockMeshVertex::new([0.0; 3], [0.5, 0.5], [0.3; 3]);
        let encoded = encode_vertex(&vertex, [1.0, 2.0, 3.0], (0.0, 0.0, 1.0, 1.0), 0.7);
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(encoded.as_bytes());
        bytes.extend_from_slice(encoded.as_bytes());
        let decoded = decode_vertices(&bytes[1..]);
        assert_eq!(decoded, vec![encoded, encoded]);
    }
}
