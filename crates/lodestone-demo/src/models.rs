//! Built-in block models and generated textures for the demo resource pack.

use image::{Rgba, RgbaImage};
use lodestone_atlas::{AtlasBuilder, AtlasConfig, AtlasError, TextureAtlas};
use lodestone_block::BlockStack;
use lodestone_mesh::{
    BlockMesh, BlockMeshTransparency, EMPTY_CHUNK_TEXTURE, ERROR_CHUNK_TEXTURE, ModelLoadError,
};

pub const MISSING_TEXTURE: &str = "missing_no";

const TEXTURES: [(&str, [u8; 4]); 8] = [
    ("stone", [125, 125, 125, 255]),
    ("dirt", [134, 96, 67, 255]),
    ("grass_top", [95, 159, 53, 255]),
    ("grass_side", [112, 120, 60, 255]),
    ("glass", [200, 230, 240, 90]),
    ("poppy", [190, 30, 30, 255]),
    ("water", [40, 80, 200, 160]),
    (MISSING_TEXTURE, [248, 0, 248, 255]),
];

const TILE: u32 = 16;

fn tile(color: [u8; 4], frames: u32) -> RgbaImage {
    RgbaImage::from_fn(TILE, TILE * frames, |x, y| {
        // Light speckle so faces are distinguishable.
        let shade = if (x * 7 + y * 13) % 5 == 0 { 20 } else { 0 };
        Rgba([
            color[0].saturating_sub(shade),
            color[1].saturating_sub(shade),
            color[2].saturating_sub(shade),
            color[3],
        ])
    })
}

fn grid_tile(line: [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(TILE, TILE, |x, y| {
        if x == 0 || y == 0 {
            Rgba(line)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Packs every demo texture, including the chunk placeholder grids.
pub fn build_atlas(config: AtlasConfig) -> Result<TextureAtlas, AtlasError> {
    let mut builder = AtlasBuilder::new(config);
    for (name, color) in TEXTURES {
        // Water is an animated strip of four frames.
        let frames = if name == "water" { 4 } else { 1 };
        builder.add_texture_from_image(name, tile(color, frames))?;
    }
    builder.add_texture_from_image(EMPTY_CHUNK_TEXTURE, grid_tile([255, 255, 255, 255]))?;
    builder.add_texture_from_image(ERROR_CHUNK_TEXTURE, grid_tile([255, 60, 60, 255]))?;
    builder.build()
}

/// Builds the mesh for a block stack. Only the base block is drawn; unknown
/// blocks get the missing-block cube.
pub fn load_block_model(stack: &BlockStack) -> Result<BlockMesh, ModelLoadError> {
    let base = stack.base();
    if base.namespace != "minecraft" {
        return Err(ModelLoadError::new(format!(
            "no models for namespace {}",
            base.namespace
        )));
    }
    let white = [1.0, 1.0, 1.0];
    let mesh = match base.base_name.as_str() {
        "air" => BlockMesh::empty(),
        "stone" | "dirt" => {
            BlockMesh::cube(&base.base_name, BlockMeshTransparency::FullOpaque, white)
        }
        "grass_block" => BlockMesh::cube_with_textures(
            [
                "grass_top",
                "dirt",
                "grass_side",
                "grass_side",
                "grass_side",
                "grass_side",
            ],
            BlockMeshTransparency::FullOpaque,
            white,
        ),
        "glass" => BlockMesh::cube("glass", BlockMeshTransparency::FullTranslucent, white),
        "water" => BlockMesh::cube(
            "water",
            BlockMeshTransparency::FullTranslucent,
            [0.25, 0.45, 0.9],
        ),
        "poppy" => BlockMesh::cross("poppy", white),
        other => {
            tracing::debug!("no model for {}, using the missing block", other);
            BlockMesh::missing_block(MISSING_TEXTURE)
        }
    };
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_block::BlockState;

    #[test]
    fn test_atlas_holds_every_texture() {
        let atlas = build_atlas(AtlasConfig::default()).unwrap();
        assert_eq!(atlas.texture_count(), TEXTURES.len() + 2);
        assert!(atlas.rect(EMPTY_CHUNK_TEXTURE).is_some());
        let (_, v0, _, v1) = atlas.rect("water").unwrap();
        // Only the first water frame is mapped.
        assert_eq!(((v1 - v0) * atlas.size() as f32).round() as u32, TILE);
    }

    #[test]
    fn test_known_blocks() {
        let glass = load_block_model(&BlockStack::single(BlockState::new("minecraft", "glass")))
            .unwrap();
        assert_eq!(glass.transparency, BlockMeshTransparency::FullTranslucent);
        let unknown =
            load_block_model(&BlockStack::single(BlockState::new("minecraft", "beacon"))).unwrap();
        assert_eq!(unknown.textures, vec![MISSING_TEXTURE.to_string()]);
    }

    #[test]
    fn test_foreign_namespace_fails() {
        let stack = BlockStack::single(BlockState::new("modded", "thing"));
        assert!(load_block_model(&stack).is_err());
    }
}
