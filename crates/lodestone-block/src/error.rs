//! Block data model error types.

use crate::section::SectionShape;

/// Errors raised while building palettes, sections and section grids.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// A section was inserted into a grid whose shape differs from it.
    #[error("section shape {found} does not match grid shape {expected}")]
    ShapeMismatch {
        /// Shape shared by every section of the grid.
        expected: SectionShape,
        /// Shape of the rejected section.
        found: SectionShape,
    },

    /// A flat index buffer does not hold exactly one entry per voxel.
    #[error("index buffer holds {found} entries, section shape needs {expected}")]
    BufferLength {
        /// Voxel count of the requested shape.
        expected: usize,
        /// Length of the supplied buffer.
        found: usize,
    },

    /// A palette lookup used an index the palette never handed out.
    #[error("palette index {0} is out of range")]
    UnknownIndex(u32),

    /// A block stack must contain at least one block state.
    #[error("a block stack needs at least one block state")]
    EmptyStack,

    /// One of the section dimensions is zero.
    #[error("section shape {0} has a zero-length axis")]
    DegenerateShape(SectionShape),
}
