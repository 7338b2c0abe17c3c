//! Immutable block snapshot of one chunk column: palette plus section grid.

use std::sync::Arc;

use crate::error::BlockError;
use crate::palette::BlockPalette;
use crate::section::{SectionArrayMap, SectionShape};

/// The block data of one chunk column, shared cheaply between threads.
///
/// Both halves sit behind [`Arc`] so a snapshot can be handed to a meshing
/// worker without copying voxel data.
#[derive(Clone, Debug)]
pub struct BlockComponentData {
    palette: Arc<BlockPalette>,
    sections: Arc<SectionArrayMap>,
}

impl BlockComponentData {
    /// Bundles a palette with its section grid.
    pub fn new(palette: BlockPalette, sections: SectionArrayMap) -> Self {
        Self {
            palette: Arc::new(palette),
            sections: Arc::new(sections),
        }
    }

    /// Bundles already-shared halves.
    pub fn from_shared(palette: Arc<BlockPalette>, sections: Arc<SectionArrayMap>) -> Self {
        Self { palette, sections }
    }

    /// The column's palette.
    pub fn palette(&self) -> &BlockPalette {
        &self.palette
    }

    /// The column's section grid.
    pub fn sections(&self) -> &SectionArrayMap {
        &self.sections
    }

    /// Shape of every section in the column.
    pub fn section_shape(&self) -> SectionShape {
        self.sections.array_shape()
    }

    /// Checks that every section only references indices the palette holds.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::UnknownIndex`] with the first offending index.
    pub fn validate(&self) -> Result<(), BlockError> {
        let len = self.palette.len() as u32;
        for (_, section) in self.sections.iter() {
            if let Some(max) = section.max_index()
                && max >= len
            {
                return Err(BlockError::UnknownIndex(max));
            }
        }
        Ok(())
    }
}
