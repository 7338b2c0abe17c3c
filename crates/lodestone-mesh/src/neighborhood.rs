//! The centre chunk and its four horizontal neighbours as seen by one
//! meshing call.
//!
//! Chunk coordinates are `(cx, cz)`. North is `cz − 1` (−Z), South is
//! `cz + 1`, East is `cx + 1` (+X) and West is `cx − 1`.

use std::fmt;

use lodestone_block::BlockComponentData;

/// One of the five chunk columns a meshing call reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkSlot {
    Center,
    North,
    East,
    South,
    West,
}

impl ChunkSlot {
    /// The four horizontal neighbours.
    pub const HORIZONTAL: [ChunkSlot; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Offset in chunk coordinates `(dcx, dcz)` from the centre.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Self::Center => (0, 0),
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

impl fmt::Display for ChunkSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Center => "centre",
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// Horizontal position of a chunk column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub cx: i64,
    pub cz: i64,
}

impl ChunkCoord {
    pub const fn new(cx: i64, cz: i64) -> Self {
        Self { cx, cz }
    }

    /// The column in `slot` relative to this one.
    pub fn neighbor(self, slot: ChunkSlot) -> Self {
        let (dcx, dcz) = slot.offset();
        Self::new(self.cx + dcx, self.cz + dcz)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.cx, self.cz)
    }
}

/// Borrowed views of the horizontal neighbours of a chunk. Any of them may be
/// absent; faces towards an absent neighbour are always drawn.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkNeighbors<'a> {
    pub north: Option<&'a BlockComponentData>,
    pub east: Option<&'a BlockComponentData>,
    pub south: Option<&'a BlockComponentData>,
    pub west: Option<&'a BlockComponentData>,
}

impl<'a> ChunkNeighbors<'a> {
    /// No neighbours.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_north(mut self, chunk: &'a BlockComponentData) -> Self {
        self.north = Some(chunk);
        self
    }

    pub fn with_east(mut self, chunk: &'a BlockComponentData) -> Self {
        self.east = Some(chunk);
        self
    }

    pub fn with_south(mut self, chunk: &'a BlockComponentData) -> Self {
        self.south = Some(chunk);
        self
    }

    pub fn with_west(mut self, chunk: &'a BlockComponentData) -> Self {
        self.west = Some(chunk);
        self
    }

    /// The neighbour in `slot`. Always `None` for [`ChunkSlot::Center`].
    pub fn get(&self, slot: ChunkSlot) -> Option<&'a BlockComponentData> {
        match slot {
            ChunkSlot::Center => None,
            ChunkSlot::North => self.north,
            ChunkSlot::East => self.east,
            ChunkSlot::South => self.south,
            ChunkSlot::West => self.west,
        }
    }

    /// Iterates the neighbours that are present.
    pub fn present(&self) -> impl Iterator<Item = (ChunkSlot, &'a BlockComponentData)> + '_ {
        ChunkSlot::HORIZONTAL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|chunk| (slot, chunk)))
    }

    /// Number of neighbours present.
    pub fn count(&self) -> usize {
        self.present().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_block::{BlockPalette, SectionArrayMap, SectionShape};

    #[test]
    fn test_opposite_slots_cancel() {
        let (nx, nz) = ChunkSlot::North.offset();
        let (sx, sz) = ChunkSlot::South.offset();
        assert_eq!((nx + sx, nz + sz), (0, 0));
        let (ex, ez) = ChunkSlot::East.offset();
        let (wx, wz) = ChunkSlot::West.offset();
        assert_eq!((ex + wx, ez + wz), (0, 0));
    }

    #[test]
    fn test_coord_neighbors() {
        let origin = ChunkCoord::new(4, -2);
        assert_eq!(origin.neighbor(ChunkSlot::North), ChunkCoord::new(4, -3));
        assert_eq!(origin.neighbor(ChunkSlot::East), ChunkCoord::new(5, -2));
        assert_eq!(origin.neighbor(ChunkSlot::Center), origin);
        assert_eq!(origin.to_string(), "(4, -2)");
    }

    #[test]
    fn test_present_neighbours() {
        let chunk = BlockComponentData::new(
            BlockPalette::new(),
            SectionArrayMap::new(SectionShape::STANDARD),
        );
        let neighbors = ChunkNeighbors::none().with_east(&chunk).with_west(&chunk);
        let slots: Vec<ChunkSlot> = neighbors.present().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![ChunkSlot::East, ChunkSlot::West]);
        assert_eq!(neighbors.count(), 2);
        assert!(neighbors.get(ChunkSlot::Center).is_none());
    }
}
