//! Resource pack abstraction and the shared block-model cache.
//!
//! The mesher only ever talks to a [`ResourcePack`]. [`ResourcePackCache`]
//! is the standard implementation: it memoizes the models built by a
//! [`BlockModelLoader`] and answers texture lookups from an immutable
//! texture → atlas-rectangle table.

use std::collections::hash_map::Entry;
use std::error::Error as StdError;
use std::sync::Arc;

use lodestone_block::BlockStack;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::block_mesh::BlockMesh;

/// Atlas rectangle of a texture as `(u0, v0, u1, v1)` in normalized atlas
/// coordinates.
pub type TextureBounds = (f32, f32, f32, f32);

/// The rectangle used when no texture table entry exists: the whole atlas.
pub const FULL_ATLAS_BOUNDS: TextureBounds = (0.0, 0.0, 1.0, 1.0);

/// A loader failed to build a block model.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ModelLoadError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ModelLoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Builds the render geometry of a block stack.
///
/// Implementations may be called concurrently for the same stack and must
/// return equivalent meshes each time.
pub trait BlockModelLoader: Send + Sync {
    fn load(&self, stack: &BlockStack) -> Result<BlockMesh, ModelLoadError>;
}

impl<F> BlockModelLoader for F
where
    F: Fn(&BlockStack) -> Result<BlockMesh, ModelLoadError> + Send + Sync,
{
    fn load(&self, stack: &BlockStack) -> Result<BlockMesh, ModelLoadError> {
        self(stack)
    }
}

/// Read-only view of a resource pack as needed by the chunk mesher.
pub trait ResourcePack: Send + Sync {
    /// The mesh for `stack`. Equal stacks always yield equal meshes.
    fn get_block_model(&self, stack: &BlockStack) -> Result<Arc<BlockMesh>, ModelLoadError>;

    /// Atlas rectangle of `texture`, or the pack's default rectangle if the
    /// texture is unknown.
    fn texture_bounds(&self, texture: &str) -> TextureBounds;
}

/// Thread-safe memoizing resource pack.
///
/// One cache exists per loaded resource pack. Block models are built on first
/// request and kept for the cache's lifetime; loader failures are not cached.
pub struct ResourcePackCache<L> {
    loader: L,
    models: RwLock<FxHashMap<BlockStack, Arc<BlockMesh>>>,
    texture_bounds: FxHashMap<String, TextureBounds>,
    default_bounds: TextureBounds,
}

impl<L: BlockModelLoader> ResourcePackCache<L> {
    /// Creates a cache over `loader` with a fixed texture table.
    pub fn new(
        loader: L,
        texture_bounds: FxHashMap<String, TextureBounds>,
        default_bounds: TextureBounds,
    ) -> Self {
        Self {
            loader,
            models: RwLock::new(FxHashMap::default()),
            texture_bounds,
            default_bounds,
        }
    }

    /// Creates a cache from atlas bounds. Unknown textures resolve to the
    /// rectangle of `missing_texture`, or to `fallback` if the atlas does not
    /// hold it either.
    pub fn with_atlas<I>(loader: L, bounds: I, missing_texture: &str, fallback: TextureBounds) -> Self
    where
        I: IntoIterator<Item = (String, TextureBounds)>,
    {
        let texture_bounds: FxHashMap<String, TextureBounds> = bounds.into_iter().collect();
        let default_bounds = match texture_bounds.get(missing_texture) {
            Some(bounds) => *bounds,
            None => {
                tracing::warn!(
                    "missing texture {:?} is not in the atlas, using {:?}",
                    missing_texture,
                    fallback
                );
                fallback
            }
        };
        Self::new(loader, texture_bounds, default_bounds)
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Rectangle returned for unknown textures.
    pub fn default_bounds(&self) -> TextureBounds {
        self.default_bounds
    }

    /// Number of block models built so far.
    pub fn cached_model_count(&self) -> usize {
        self.models.read().len()
    }

    /// Number of entries in the texture table.
    pub fn texture_count(&self) -> usize {
        self.texture_bounds.len()
    }
}

impl<L: BlockModelLoader> ResourcePack for ResourcePackCache<L> {
    fn get_block_model(&self, stack: &BlockStack) -> Result<Arc<BlockMesh>, ModelLoadError> {
        if let Some(mesh) = self.models.read().get(stack) {
            return Ok(Arc::clone(mesh));
        }

        // Only one upgradable guard exists at a time, so this re-check sees any
        // insert that completed after the shared read above.
        let guard = self.models.upgradable_read();
        if let Some(mesh) = guard.get(stack) {
            return Ok(Arc::clone(mesh));
        }
        drop(guard);

        // The loader runs with no lock held. Two threads that pass the re-check
        // before either inserts both load the stack; the first insert wins and
        // the later result is dropped, so callers observe a single mesh.
        tracing::trace!("block model cache miss for {}", stack);
        let mesh = match self.loader.load(stack) {
            Ok(mesh) => Arc::new(mesh),
            Err(err) => {
                tracing::warn!("failed to load block model for {}: {}", stack, err);
                return Err(err);
            }
        };

        match self.models.write().entry(stack.clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!("discarding duplicate block model load for {}", stack);
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => Ok(Arc::clone(entry.insert(mesh))),
        }
    }

    fn texture_bounds(&self, texture: &str) -> TextureBounds {
        self.texture_bounds
            .get(texture)
            .copied()
            .unwrap_or(self.default_bounds)
    }
}
