//! The two vertex buffers produced for one chunk column.

use crate::block_mesh::BlockMeshTransparency;
use crate::packed::{ChunkVertex, VERTEX_STRIDE, decode_vertices};

/// Opaque and translucent vertex bytes of one chunk.
///
/// Both buffers are concatenations of 48-byte [`ChunkVertex`] records, three
/// per triangle. The buffer a block's geometry lands in is chosen by that
/// block's transparency, not by the face.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkMeshBuffers {
    pub opaque: Vec<u8>,
    pub translucent: Vec<u8>,
}

impl ChunkMeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer that geometry of a block with `transparency` is written to.
    pub fn buffer_for(&mut self, transparency: BlockMeshTransparency) -> &mut Vec<u8> {
        match transparency {
            BlockMeshTransparency::FullOpaque => &mut self.opaque,
            BlockMeshTransparency::FullTranslucent | BlockMeshTransparency::Partial => {
                &mut self.translucent
            }
        }
    }

    pub fn opaque_vertex_count(&self) -> usize {
        self.opaque.len() / VERTEX_STRIDE
    }

    pub fn translucent_vertex_count(&self) -> usize {
        self.translucent.len() / VERTEX_STRIDE
    }

    /// Total vertices across both buffers.
    pub fn vertex_count(&self) -> usize {
        self.opaque_vertex_count() + self.translucent_vertex_count()
    }

    /// Total triangles across both buffers.
    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    /// Total size in bytes of both buffers.
    pub fn byte_len(&self) -> usize {
        self.opaque.len() + self.translucent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.translucent.is_empty()
    }

    /// Appends another chunk's buffers onto this one.
    pub fn append(&mut self, other: &mut ChunkMeshBuffers) {
        self.opaque.append(&mut other.opaque);
        self.translucent.append(&mut other.translucent);
    }

    /// A single upload buffer: opaque records followed by translucent ones.
    ///
    /// The translucent range starts at byte `opaque.len()`.
    pub fn into_combined(self) -> Vec<u8> {
        let mut combined = self.opaque;
        combined.extend_from_slice(&self.translucent);
        combined
    }

    pub fn opaque_vertices(&self) -> Vec<ChunkVertex> {
        decode_vertices(&self.opaque)
    }

    pub fn translucent_vertices(&self) -> Vec<ChunkVertex> {
        decode_vertices(&self.translucent)
    }

    /// Every vertex, opaque first.
    pub fn vertices(&self) -> Vec<ChunkVertex> {
        let mut vertices = self.opaque_vertices();
        vertices.extend(self.translucent_vertices());
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_mesh::BlockMeshVertex;
    use crate::packed::encode_vertex;

    fn vertex(y: f32) -> ChunkVertex {
        encode_vertex(
            &BlockMeshVertex::new([0.0, y, 0.0], [0.0, 0.0], [1.0; 3]),
            [0.0; 3],
            (0.0, 0.0, 1.0, 1.0),
            1.0,
        )
    }

    #[test]
    fn test_buffer_routing() {
        let mut buffers = ChunkMeshBuffers::new();
        buffers
            .buffer_for(BlockMeshTransparency::FullOpaque)
            .extend_from_slice(vertex(1.0).as_bytes());
        buffers
            .buffer_for(BlockMeshTransparency::Partial)
            .extend_from_slice(vertex(2.0).as_bytes());
        buffers
            .buffer_for(BlockMeshTransparency::FullTranslucent)
            .extend_from_slice(vertex(3.0).as_bytes());
        assert_eq!(buffers.opaque_vertex_count(), 1);
        assert_eq!(buffers.translucent_vertex_count(), 2);
        assert_eq!(buffers.vertex_count(), 3);
        assert_eq!(buffers.triangle_count(), 1);
    }

    #[test]
    fn test_combined_puts_opaque_first() {
        let mut buffers = ChunkMeshBuffers::new();
        buffers.translucent.extend_from_slice(vertex(2.0).as_bytes());
        buffers.opaque.extend_from_slice(vertex(1.0).as_bytes());
        let ys: Vec<f32> = buffers.vertices().iter().map(|v| v.position[1]).collect();
        assert_eq!(ys, vec![1.0, 2.0]);
        let combined = buffers.into_combined();
        assert_eq!(combined.len(), 2 * VERTEX_STRIDE);
        assert_eq!(decode_vertices(&combined)[0].position[1], 1.0);
    }

    #[test]
    fn test_empty() {
        let buffers = ChunkMeshBuffers::default();
        assert!(buffers.is_empty());
        assert_eq!(buffers.byte_len(), 0);
    }
}
