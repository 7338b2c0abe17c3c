//! Texture atlas builder: packs named RGBA images into one square image.
//!
//! Textures are packed largest-perimeter first into a power-of-two square
//! that starts just big enough for the total pixel area and doubles until
//! everything fits. Bounds are reported in the order textures were added.

use std::collections::HashSet;
use std::path::Path;

use image::{RgbaImage, imageops};
use thiserror::Error;

use crate::pack::{PackRegion, Placement};

/// Normalized atlas rectangle `(u0, v0, u1, v1)`.
pub type AtlasRect = (f32, f32, f32, f32);

// ---------------------------------------------------------------------------
// AtlasError
// ---------------------------------------------------------------------------

/// Errors returned during atlas construction.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The textures do not fit in an atlas of the largest allowed size.
    #[error("textures need an atlas larger than {required}x{required} (max {max})")]
    TooLarge {
        /// Smallest size that was tried and failed.
        required: u32,
        /// Configured size limit.
        max: u32,
    },

    /// Failed to load an image file.
    #[error("image load error: {0}")]
    ImageLoad(#[from] image::ImageError),

    /// A texture with no pixels.
    #[error("texture {0:?} is empty")]
    EmptyTexture(String),
}

// ---------------------------------------------------------------------------
// AtlasConfig
// ---------------------------------------------------------------------------

/// Atlas construction settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Pixels of stretched edge drawn around every texture.
    pub border: u32,
    /// Largest edge length the atlas may grow to.
    pub max_size: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            border: 0,
            max_size: 16384,
        }
    }
}

// ---------------------------------------------------------------------------
// TextureAtlas
// ---------------------------------------------------------------------------

/// A packed atlas image and the rectangle of each texture inside it.
#[derive(Debug)]
pub struct TextureAtlas {
    /// The square RGBA atlas.
    pub image: RgbaImage,
    /// `(name, rect)` in insertion order.
    pub bounds: Vec<(String, AtlasRect)>,
}

impl TextureAtlas {
    /// Edge length of the square atlas in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Rectangle of `name`, if it was packed.
    pub fn rect(&self, name: &str) -> Option<AtlasRect> {
        self.bounds
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rect)| *rect)
    }

    pub fn texture_count(&self) -> usize {
        self.bounds.len()
    }
}

// ---------------------------------------------------------------------------
// AtlasBuilder
// ---------------------------------------------------------------------------

/// Collects textures and packs them into a [`TextureAtlas`].
pub struct AtlasBuilder {
    config: AtlasConfig,
    textures: Vec<(String, RgbaImage)>,
    names: HashSet<String>,
}

impl AtlasBuilder {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            textures: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Loads an image file and adds it under `name`.
    pub fn add_texture(&mut self, name: &str, path: &Path) -> Result<(), AtlasError> {
        let image = image::open(path)?.to_rgba8();
        self.add_texture_from_image(name, image)
    }

    /// Adds an in-memory image under `name`. A name that is already present
    /// keeps its first image.
    pub fn add_texture_from_image(&mut self, name: &str, image: RgbaImage) -> Result<(), AtlasError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(AtlasError::EmptyTexture(name.to_string()));
        }
        if !self.names.insert(name.to_string()) {
            tracing::debug!("texture {} already added, keeping the first image", name);
            return Ok(());
        }
        self.textures.push((name.to_string(), image));
        Ok(())
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Edge length the first packing attempt uses.
    pub fn initial_size(&self) -> u32 {
        let mut max_w = 0;
        let mut max_h = 0;
        let mut pixels: u64 = 0;
        for (_, image) in &self.textures {
            max_w = max_w.max(image.width());
            max_h = max_h.max(image.height());
            pixels += u64::from(image.width()) * u64::from(image.height());
        }
        let side = ((pixels as f64).sqrt().ceil() as u32).max(1).next_power_of_two();
        side.max(max_w).max(max_h)
    }

    /// Packs every texture, doubling the atlas until all of them fit.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::TooLarge`] once the size would exceed
    /// [`AtlasConfig::max_size`].
    pub fn build(self) -> Result<TextureAtlas, AtlasError> {
        let mut order: Vec<usize> = (0..self.textures.len()).collect();
        order.sort_by_key(|&i| {
            let image = &self.textures[i].1;
            std::cmp::Reverse(2 * image.width() + 2 * image.height())
        });

        let mut size = self.initial_size();
        let placements = loop {
            if size > self.config.max_size {
                return Err(AtlasError::TooLarge {
                    required: size,
                    max: self.config.max_size,
                });
            }
            tracing::info!("Trying to pack {} textures into {}x{}", order.len(), size, size);
            match self.try_pack(size, &order) {
                Some(placements) => break placements,
                None => {
                    tracing::debug!("atlas of size {} too small, doubling", size);
                    size = size.saturating_mul(2);
                }
            }
        };
        tracing::info!("Packed {} textures into a {}x{} atlas", order.len(), size, size);

        let mut image = RgbaImage::new(size, size);
        for ((_, texture), placement) in self.textures.iter().zip(&placements) {
            self.draw(&mut image, texture, *placement);
        }

        let scale = size as f32;
        let bounds = self
            .textures
            .into_iter()
            .zip(placements)
            .map(|((name, texture), p)| {
                // Animated textures are vertical strips; only the first frame is mapped.
                let frame_h = texture.height().min(texture.width());
                let rect = (
                    p.x as f32 / scale,
                    p.y as f32 / scale,
                    (p.x + texture.width()) as f32 / scale,
                    (p.y + frame_h) as f32 / scale,
                );
                (name, rect)
            })
            .collect();

        Ok(TextureAtlas { image, bounds })
    }

    /// Placements indexed like `self.textures`, or `None` if `size` is too small.
    fn try_pack(&self, size: u32, order: &[usize]) -> Option<Vec<Placement>> {
        let mut root = PackRegion::new(0, 0, size, size);
        let mut placements = vec![Placement { x: 0, y: 0 }; self.textures.len()];
        for &i in order {
            let image = &self.textures[i].1;
            placements[i] = root.pack(image.width(), image.height(), self.config.border)?;
        }
        Some(placements)
    }

    fn draw(&self, atlas: &mut RgbaImage, texture: &RgbaImage, at: Placement) {
        let border = self.config.border;
        if border > 0 {
            let stretched = imageops::resize(
                texture,
                texture.width() + border * 2,
                texture.height() + border * 2,
                imageops::FilterType::Nearest,
            );
            imageops::replace(
                atlas,
                &stretched,
                i64::from(at.x - border),
                i64::from(at.y - border),
            );
        }
        imageops::replace(atlas, texture, i64::from(at.x), i64::from(at.y));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
