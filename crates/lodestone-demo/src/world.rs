//! Procedural test world: a square of chunk columns with rolling terrain,
//! a water table, flowers and a few glass pillars.

use std::collections::BTreeMap;
use std::sync::Arc;

use lodestone_block::{
    BlockComponentData, BlockError, BlockPalette, BlockStack, BlockState, IndexArray3D,
    SectionArrayMap, SectionShape,
};
use lodestone_mesh::{ChunkCoord, ChunkGeometryState, ChunkSlot, MeshInvalidator, MeshingTask};

const AIR: u32 = 0;
const STONE: u32 = 1;
const DIRT: u32 = 2;
const GRASS: u32 = 3;
const GLASS: u32 = 4;
const POPPY: u32 = 5;
const WATER: u32 = 6;

const BLOCK_NAMES: [&str; 7] = ["air", "stone", "dirt", "grass_block", "glass", "poppy", "water"];

const SEA_LEVEL: i64 = 18;

fn stack(name: &str) -> BlockStack {
    BlockStack::single(BlockState::new("minecraft", name))
}

fn scatter(wx: i64, wz: i64) -> u64 {
    (wx.wrapping_mul(73_856_093) ^ wz.wrapping_mul(19_349_663)).unsigned_abs()
}

fn surface_height(wx: i64, wz: i64, top: i64) -> i64 {
    let wave = (wx as f64 * 0.21).sin() * 4.0 + (wz as f64 * 0.17).cos() * 3.0;
    (20 + wave as i64).clamp(1, top - 2)
}

fn block_at(wx: i64, wy: i64, wz: i64, height: i64) -> u32 {
    if wy < height - 3 {
        return STONE;
    }
    if wy < height {
        return DIRT;
    }
    if wy == height {
        return GRASS;
    }
    let roll = scatter(wx, wz);
    if roll % 37 == 0 && wy <= height + 3 {
        GLASS
    } else if wy == height + 1 && roll % 11 == 0 {
        POPPY
    } else if wy <= SEA_LEVEL {
        WATER
    } else {
        AIR
    }
}

/// Loaded chunk columns and their geometry bookkeeping.
pub struct World {
    shape: SectionShape,
    chunks: BTreeMap<ChunkCoord, Arc<BlockComponentData>>,
    states: BTreeMap<ChunkCoord, ChunkGeometryState>,
}

impl World {
    /// Generates every chunk within `radius` of the origin, `sections` tall.
    pub fn generate(radius: i64, sections: u32, shape: SectionShape) -> Result<Self, BlockError> {
        let mut world = Self {
            shape,
            chunks: BTreeMap::new(),
            states: BTreeMap::new(),
        };
        let top = sections as i64 * shape.y as i64;
        for cx in -radius..=radius {
            for cz in -radius..=radius {
                let coord = ChunkCoord::new(cx, cz);
                let data = world.generate_column(coord, sections, top)?;
                world.chunks.insert(coord, Arc::new(data));
                world.states.insert(coord, ChunkGeometryState::new());
            }
        }
        Ok(world)
    }

    fn generate_column(
        &self,
        coord: ChunkCoord,
        sections: u32,
        top: i64,
    ) -> Result<BlockComponentData, BlockError> {
        let shape = self.shape;
        let palette = BlockPalette::from_stacks(BLOCK_NAMES.iter().map(|name| stack(name)));
        let mut grid = SectionArrayMap::new(shape);

        for cy in 0..sections as i64 {
            let mut section = IndexArray3D::new(shape, AIR)?;
            for x in 0..shape.x {
                let wx = coord.cx * shape.x as i64 + x as i64;
                for z in 0..shape.z {
                    let wz = coord.cz * shape.z as i64 + z as i64;
                    let height = surface_height(wx, wz, top);
                    for y in 0..shape.y {
                        let wy = cy * shape.y as i64 + y as i64;
                        section.set(x, y, z, block_at(wx, wy, wz, height));
                    }
                }
            }
            // All-air sections are left out of the grid.
            if section.max_index() != Some(AIR) {
                grid.insert(cy, section)?;
            }
        }
        Ok(BlockComponentData::new(palette, grid))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn state(&self, coord: ChunkCoord) -> Option<&ChunkGeometryState> {
        self.states.get(&coord)
    }

    pub fn state_mut(&mut self, coord: ChunkCoord) -> Option<&mut ChunkGeometryState> {
        self.states.get_mut(&coord)
    }

    /// Chunks whose installed geometry is missing or stale and not yet queued.
    pub fn chunks_needing_remesh(&self) -> Vec<ChunkCoord> {
        self.states
            .iter()
            .filter(|(_, state)| state.needs_remesh())
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Snapshots `coord` and its loaded horizontal neighbours.
    pub fn meshing_task(&self, coord: ChunkCoord) -> Option<MeshingTask> {
        let center = self.chunks.get(&coord)?;
        let version = self.states.get(&coord)?.chunk_state();
        let mut task = MeshingTask::new(coord, Arc::clone(center), version);
        for slot in ChunkSlot::HORIZONTAL {
            let neighbor = self.chunks.get(&coord.neighbor(slot)).cloned();
            match slot {
                ChunkSlot::North => task.north = neighbor,
                ChunkSlot::East => task.east = neighbor,
                ChunkSlot::South => task.south = neighbor,
                ChunkSlot::West => task.west = neighbor,
                ChunkSlot::Center => {}
            }
        }
        Some(task)
    }

    /// Replaces one block and marks every chunk whose mesh reads it as
    /// changed. Returns the loaded chunks that now need a remesh.
    pub fn set_block(
        &mut self,
        coord: ChunkCoord,
        x: usize,
        wy: i64,
        z: usize,
        name: &str,
    ) -> Result<Vec<ChunkCoord>, BlockError> {
        let Some(data) = self.chunks.get(&coord) else {
            return Ok(Vec::new());
        };
        let shape = self.shape;
        let cy = wy.div_euclid(shape.y as i64);
        let y = wy.rem_euclid(shape.y as i64) as usize;

        let mut palette = data.palette().clone();
        let index = palette.insert(stack(name));
        let mut grid = data.sections().clone();
        let mut section = match grid.get(cy) {
            Some(section) => section.clone(),
            None => IndexArray3D::new(shape, AIR)?,
        };
        section.set(x, y, z, index);
        grid.insert(cy, section)?;
        self.chunks
            .insert(coord, Arc::new(BlockComponentData::new(palette, grid)));

        let dirty: Vec<ChunkCoord> = MeshInvalidator::invalidate(coord, (x, y, z), shape)
            .into_iter()
            .filter(|c| self.chunks.contains_key(c))
            .collect();
        for c in &dirty {
            if let Some(state) = self.states.get_mut(c) {
                state.mark_changed();
            }
        }
        tracing::debug!("edit in chunk {} dirtied {} chunks", coord, dirty.len());
        Ok(dirty)
    }
}
