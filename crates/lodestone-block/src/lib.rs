//! Block data model consumed by the chunk mesher: block stacks, per-chunk palettes,
//! fixed-shape section arrays and the sparse per-column section grid.

pub mod block;
pub mod component;
pub mod error;
pub mod palette;
pub mod section;

pub use block::{BlockStack, BlockState};
pub use component::BlockComponentData;
pub use error::BlockError;
pub use palette::BlockPalette;
pub use section::{IndexArray3D, SectionArrayMap, SectionShape};
