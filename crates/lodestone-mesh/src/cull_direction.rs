//! Cull directions for block-mesh parts: the six cardinal faces plus `None`
//! for geometry that is never culled.
//!
//! Axis convention: Up is +Y, Down is −Y, North is −Z, South is +Z,
//! East is +X, West is −X.

use std::fmt;

/// The direction a block-mesh part faces, used to decide whether it is hidden
/// by the neighbouring voxel.
///
/// The `repr(u8)` discriminant doubles as the slot index inside
/// [`crate::BlockMesh::parts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CullDirection {
    /// Never culled (cross-shaped plants, inner geometry).
    None = 0,
    /// +Y.
    Up = 1,
    /// −Y.
    Down = 2,
    /// −Z.
    North = 3,
    /// +Z.
    South = 4,
    /// +X.
    East = 5,
    /// −X.
    West = 6,
}

impl CullDirection {
    /// All seven directions in slot order.
    pub const ALL: [CullDirection; 7] = [
        Self::None,
        Self::Up,
        Self::Down,
        Self::North,
        Self::South,
        Self::East,
        Self::West,
    ];

    /// The six culled directions, in the order the mesher emits them.
    pub const DIRECTIONAL: [CullDirection; 6] = [
        Self::Up,
        Self::Down,
        Self::North,
        Self::South,
        Self::East,
        Self::West,
    ];

    /// Offset to the voxel whose transparency decides this part's visibility.
    ///
    /// Returns `None` for [`CullDirection::None`].
    pub fn offset(self) -> Option<(i32, i32, i32)> {
        match self {
            Self::None => None,
            Self::Up => Some((0, 1, 0)),
            Self::Down => Some((0, -1, 0)),
            Self::North => Some((0, 0, -1)),
            Self::South => Some((0, 0, 1)),
            Self::East => Some((1, 0, 0)),
            Self::West => Some((-1, 0, 0)),
        }
    }

    /// Tint multiplier applied to every vertex of a part facing this way.
    pub fn shading(self) -> f32 {
        match self {
            Self::None | Self::Up => 1.0,
            Self::Down => 0.55,
            Self::North | Self::South => 0.85,
            Self::East | Self::West => 0.7,
        }
    }

    /// Returns the opposite direction. `None` maps to itself.
    pub fn opposite(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Returns the slot index (0–6).
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CullDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Up => "up",
            Self::Down => "down",
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_indices_match_all_order() {
        for (i, dir) in CullDirection::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn test_directional_excludes_none() {
        assert!(!CullDirection::DIRECTIONAL.contains(&CullDirection::None));
        assert!(CullDirection::None.offset().is_none());
        for dir in CullDirection::DIRECTIONAL {
            assert!(dir.offset().is_some());
        }
    }

    #[test]
    fn test_opposite_offsets_cancel() {
        for dir in CullDirection::DIRECTIONAL {
            let (ax, ay, az) = dir.offset().unwrap();
            let (bx, by, bz) = dir.opposite().offset().unwrap();
            assert_eq!((ax + bx, ay + by, az + bz), (0, 0, 0));
        }
    }

    #[test]
    fn test_shading_factors() {
        assert_eq!(CullDirection::Up.shading(), 1.0);
        assert_eq!(CullDirection::Down.shading(), 0.55);
        assert_eq!(CullDirection::North.shading(), 0.85);
        assert_eq!(CullDirection::South.shading(), 0.85);
        assert_eq!(CullDirection::East.shading(), 0.7);
        assert_eq!(CullDirection::West.shading(), 0.7);
        assert_eq!(CullDirection::None.shading(), 1.0);
    }

    #[test]
    fn test_north_is_negative_z() {
        assert_eq!(CullDirection::North.offset(), Some((0, 0, -1)));
        assert_eq!(CullDirection::East.offset(), Some((1, 0, 0)));
    }
}
