//! Fixed-shape section arrays and the sparse per-column section grid.
//!
//! Every [`IndexArray3D`] is stored row-major with `z` varying fastest:
//! `index = x * (Y * Z) + y * Z + z`. All sections of one
//! [`SectionArrayMap`] share a single [`SectionShape`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BlockError;

// ---------------------------------------------------------------------------
// SectionShape
// ---------------------------------------------------------------------------

/// Dimensions of one section in voxels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionShape {
    /// Extent along X.
    pub x: usize,
    /// Extent along Y (also the world-space height of one section slot).
    pub y: usize,
    /// Extent along Z.
    pub z: usize,
}

impl SectionShape {
    /// The standard 16×16×16 section.
    pub const STANDARD: SectionShape = SectionShape::new(16, 16, 16);

    /// Creates a shape.
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Total voxel count.
    pub fn volume(&self) -> usize {
        self.x * self.y * self.z
    }

    /// Stride between consecutive `x` values in a flat buffer.
    pub fn x_stride(&self) -> usize {
        self.y * self.z
    }

    /// Stride between consecutive `y` values in a flat buffer.
    pub fn y_stride(&self) -> usize {
        self.z
    }

    /// Flat buffer index of `(x, y, z)`.
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x * self.x_stride() + y * self.y_stride() + z
    }

    /// Returns `true` if `(x, y, z)` lies inside the shape.
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.x && y < self.y && z < self.z
    }
}

impl Default for SectionShape {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for SectionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// IndexArray3D
// ---------------------------------------------------------------------------

/// Dense 3D array of palette indices for one vertical slot of a chunk column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexArray3D {
    shape: SectionShape,
    buffer: Vec<u32>,
}

impl IndexArray3D {
    /// Creates a section filled with one palette index.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::DegenerateShape`] if any axis is zero.
    pub fn new(shape: SectionShape, fill: u32) -> Result<Self, BlockError> {
        if shape.volume() == 0 {
            return Err(BlockError::DegenerateShape(shape));
        }
        Ok(Self {
            shape,
            buffer: vec![fill; shape.volume()],
        })
    }

    /// Wraps an existing flat buffer laid out as described in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::DegenerateShape`] for a zero-sized shape and
    /// [`BlockError::BufferLength`] if `buffer` does not hold one index per voxel.
    pub fn from_buffer(shape: SectionShape, buffer: Vec<u32>) -> Result<Self, BlockError> {
        if shape.volume() == 0 {
            return Err(BlockError::DegenerateShape(shape));
        }
        if buffer.len() != shape.volume() {
            return Err(BlockError::BufferLength {
                expected: shape.volume(),
                found: buffer.len(),
            });
        }
        Ok(Self { shape, buffer })
    }

    /// The section's shape.
    pub fn shape(&self) -> SectionShape {
        self.shape
    }

    /// The palette index at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the shape.
    pub fn get(&self, x: usize, y: usize, z: usize) -> u32 {
        debug_assert!(self.shape.contains(x, y, z));
        self.buffer[self.shape.index(x, y, z)]
    }

    /// Sets the palette index at `(x, y, z)`.
    ///
    /// Out-of-bounds writes are ignored with a warning.
    pub fn set(&mut self, x: usize, y: usize, z: usize, index: u32) {
        if !self.shape.contains(x, y, z) {
            tracing::warn!("IndexArray3D::set out of bounds: ({}, {}, {})", x, y, z);
            return;
        }
        let i = self.shape.index(x, y, z);
        self.buffer[i] = index;
    }

    /// Overwrites every voxel with `index`.
    pub fn fill(&mut self, index: u32) {
        self.buffer.fill(index);
    }

    /// The flat index buffer.
    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    /// Largest palette index referenced, or `None` for an empty buffer.
    pub fn max_index(&self) -> Option<u32> {
        self.buffer.iter().copied().max()
    }
}

// ---------------------------------------------------------------------------
// SectionArrayMap
// ---------------------------------------------------------------------------

/// Sparse mapping from vertical slot (`cy`) to section array for one chunk column.
///
/// Missing slots hold no blocks. Iteration is ordered by `cy`, so anything
/// derived from the grid in iteration order is deterministic.
#[derive(Clone, Debug)]
pub struct SectionArrayMap {
    shape: SectionShape,
    arrays: BTreeMap<i64, Arc<IndexArray3D>>,
}

impl SectionArrayMap {
    /// Creates an empty grid whose sections all have `shape`.
    pub fn new(shape: SectionShape) -> Self {
        Self {
            shape,
            arrays: BTreeMap::new(),
        }
    }

    /// Shape shared by every section in this grid.
    pub fn array_shape(&self) -> SectionShape {
        self.shape
    }

    /// Stores `section` at slot `cy`, replacing any previous section.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ShapeMismatch`] if the section's shape differs
    /// from the grid's.
    pub fn insert(&mut self, cy: i64, section: IndexArray3D) -> Result<(), BlockError> {
        self.insert_shared(cy, Arc::new(section))
    }

    /// Like [`Self::insert`] but shares an existing allocation.
    pub fn insert_shared(&mut self, cy: i64, section: Arc<IndexArray3D>) -> Result<(), BlockError> {
        if section.shape() != self.shape {
            return Err(BlockError::ShapeMismatch {
                expected: self.shape,
                found: section.shape(),
            });
        }
        self.arrays.insert(cy, section);
        Ok(())
    }

    /// Removes the section at `cy`, returning it if present.
    pub fn remove(&mut self, cy: i64) -> Option<Arc<IndexArray3D>> {
        self.arrays.remove(&cy)
    }

    /// The section at slot `cy`, if any.
    pub fn get(&self, cy: i64) -> Option<&IndexArray3D> {
        self.arrays.get(&cy).map(Arc::as_ref)
    }

    /// Returns `true` if slot `cy` holds a section.
    pub fn contains(&self, cy: i64) -> bool {
        self.arrays.contains_key(&cy)
    }

    /// Iterates `(cy, section)` in ascending `cy` order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &IndexArray3D)> {
        self.arrays.iter().map(|(cy, s)| (*cy, s.as_ref()))
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Returns `true` if no slot is populated.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout_is_z_fastest() {
        let shape = SectionShape::new(2, 3, 4);
        assert_eq!(shape.index(0, 0, 1), 1);
        assert_eq!(shape.index(0, 1, 0), 4);
        assert_eq!(shape.index(1, 0, 0), 12);
        assert_eq!(shape.index(1, 2, 3), 23);
    }

    #[test]
    fn test_set_and_get() {
        let mut section = IndexArray3D::new(SectionShape::STANDARD, 0).unwrap();
        section.set(3, 4, 5, 9);
        assert_eq!(section.get(3, 4, 5), 9);
        assert_eq!(section.get(5, 4, 3), 0);
        assert_eq!(section.max_index(), Some(9));
    }

    #[test]
    fn test_out_of_bounds_set_is_ignored() {
        let mut section = IndexArray3D::new(SectionShape::new(2, 2, 2), 1).unwrap();
        section.set(2, 0, 0, 5);
        assert!(section.buffer().iter().all(|&i| i == 1));
    }

    #[test]
    fn test_from_buffer_checks_length() {
        let result = IndexArray3D::from_buffer(SectionShape::new(2, 2, 2), vec![0; 7]);
        assert!(matches!(
            result,
            Err(BlockError::BufferLength {
                expected: 8,
                found: 7
            })
        ));
    }

    #[test]
    fn test_degenerate_shape_rejected() {
        assert!(matches!(
            IndexArray3D::new(SectionShape::new(0, 16, 16), 0),
            Err(BlockError::DegenerateShape(_))
        ));
    }

    #[test]
    fn test_grid_rejects_wrong_shape() {
        let mut grid = SectionArrayMap::new(SectionShape::STANDARD);
        let wrong = IndexArray3D::new(SectionShape::new(8, 8, 8), 0).unwrap();
        assert!(matches!(
            grid.insert(0, wrong),
            Err(BlockError::ShapeMismatch { .. })
        ));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_grid_iterates_in_slot_order() {
        let shape = SectionShape::new(1, 1, 1);
        let mut grid = SectionArrayMap::new(shape);
        for cy in [3, -2, 0, 1] {
            grid.insert(cy, IndexArray3D::new(shape, 0).unwrap()).unwrap();
        }
        let slots: Vec<i64> = grid.iter().map(|(cy, _)| cy).collect();
        assert_eq!(slots, vec![-2, 0, 1, 3]);
        assert!(grid.contains(-2));
        assert!(!grid.contains(2));
    }
}
