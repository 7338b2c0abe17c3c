//! Padded transparency volume used to cull faces without bounds checks.
//!
//! The halo covers one section plus a one-voxel border on every side, so a
//! section of shape `X×Y×Z` maps to a volume of `(X+2)×(Y+2)×(Z+2)` cells.
//! Interior voxel `(x, y, z)` lives at padded cell `(x+1, y+1, z+1)`.

use lodestone_block::SectionShape;

use crate::block_mesh::BlockMeshTransparency;

#[derive(Clone, Debug)]
pub struct TransparencyHalo {
    shape: SectionShape,
    padded: SectionShape,
    cells: Vec<BlockMeshTransparency>,
}

impl TransparencyHalo {
    /// Creates a halo for sections of `shape`, filled with
    /// [`BlockMeshTransparency::Partial`].
    pub fn new(shape: SectionShape) -> Self {
        let padded = SectionShape::new(shape.x + 2, shape.y + 2, shape.z + 2);
        Self {
            shape,
            padded,
            cells: vec![BlockMeshTransparency::Partial; padded.volume()],
        }
    }

    /// Shape of the section the halo surrounds.
    pub fn shape(&self) -> SectionShape {
        self.shape
    }

    /// Shape of the padded volume.
    pub fn padded_shape(&self) -> SectionShape {
        self.padded
    }

    /// Resets every cell to [`BlockMeshTransparency::Partial`] so the halo can
    /// be reused for the next section.
    pub fn reset(&mut self) {
        self.cells.fill(BlockMeshTransparency::Partial);
    }

    /// Value at padded cell `(px, py, pz)`.
    #[inline]
    pub fn get(&self, px: usize, py: usize, pz: usize) -> BlockMeshTransparency {
        self.cells[self.padded.index(px, py, pz)]
    }

    /// Writes padded cell `(px, py, pz)`.
    #[inline]
    pub fn set(&mut self, px: usize, py: usize, pz: usize, value: BlockMeshTransparency) {
        let i = self.padded.index(px, py, pz);
        self.cells[i] = value;
    }

    /// Value of the cell next to interior voxel `(x, y, z)` in direction
    /// `(dx, dy, dz)`, each component in `-1..=1`.
    #[inline]
    pub fn neighbor(&self, x: usize, y: usize, z: usize, offset: (i32, i32, i32)) -> BlockMeshTransparency {
        let (dx, dy, dz) = offset;
        self.get(
            (x as i64 + 1 + dx as i64) as usize,
            (y as i64 + 1 + dy as i64) as usize,
            (z as i64 + 1 + dz as i64) as usize,
        )
    }
}
