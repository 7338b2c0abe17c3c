//! Texture atlas packing: places every block texture into one RGBA image and
//! reports each texture's rectangle in normalized atlas coordinates.

mod atlas;
mod pack;

pub use atlas::{AtlasBuilder, AtlasConfig, AtlasError, AtlasRect, TextureAtlas};
pub use pack::{PackRegion, Placement};
