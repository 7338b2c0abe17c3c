//! Meshing error types.

use lodestone_block::{BlockStack, SectionShape};

use crate::neighborhood::ChunkSlot;
use crate::resource_pack::ModelLoadError;

/// Errors that abort a chunk meshing call. No partial buffers are returned.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// A neighbour chunk's sections do not have the centre chunk's shape.
    #[error("{side} chunk section shape {found} does not match centre shape {expected}")]
    ShapeMismatch {
        side: ChunkSlot,
        expected: SectionShape,
        found: SectionShape,
    },

    /// The resource pack could not build a model for a block stack.
    #[error("failed to resolve block model for {stack}")]
    ModelResolution {
        stack: BlockStack,
        #[source]
        source: ModelLoadError,
    },

    /// A voxel refers to an index its chunk's palette does not hold.
    #[error("{side} chunk palette has no entry for index {index}")]
    UnknownPaletteIndex { side: ChunkSlot, index: u32 },

    /// A triangle refers to a texture slot its block mesh does not list.
    #[error("triangle uses texture slot {index} but the block mesh lists {len} textures")]
    TextureIndex { index: usize, len: usize },

    /// A triangle refers to a vertex its part does not hold.
    #[error("triangle uses vertex {index} but the part holds {len} vertices")]
    VertexIndex { index: usize, len: usize },
}
