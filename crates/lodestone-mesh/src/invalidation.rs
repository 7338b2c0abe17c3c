//! Tracks whether a chunk's installed geometry is current and which chunk
//! meshes an edit makes stale.

use lodestone_block::SectionShape;

use crate::neighborhood::{ChunkCoord, ChunkSlot};

/// Change counter for one chunk column.
///
/// `chunk_state` advances every time the chunk's blocks change;
/// `geometry_state` records the `chunk_state` the installed mesh was built
/// from.
#[derive(Clone, Debug, Default)]
pub struct ChunkGeometryState {
    chunk_state: u64,
    geometry_state: Option<u64>,
    remesh_pending: bool,
}

impl ChunkGeometryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version of the chunk's block data.
    pub fn chunk_state(&self) -> u64 {
        self.chunk_state
    }

    /// Version the installed geometry was built from, if any.
    pub fn geometry_state(&self) -> Option<u64> {
        self.geometry_state
    }

    /// Records a change to the chunk's blocks or a neighbour's boundary.
    pub fn mark_changed(&mut self) {
        self.chunk_state = self.chunk_state.wrapping_add(1);
    }

    /// Returns `true` if the installed geometry is missing or out of date.
    pub fn has_changed(&self) -> bool {
        self.geometry_state != Some(self.chunk_state)
    }

    /// Returns `true` if a remesh should be submitted now.
    pub fn needs_remesh(&self) -> bool {
        self.has_changed() && !self.remesh_pending
    }

    /// Records that a remesh for the current state was submitted.
    pub fn mark_pending(&mut self) {
        self.remesh_pending = true;
    }

    /// Installs geometry built from `state`.
    ///
    /// Returns `false` and leaves the state untouched if `state` is older
    /// than the current chunk state; the caller should drop that geometry.
    pub fn set_geometry(&mut self, state: u64) -> bool {
        self.remesh_pending = false;
        if state != self.chunk_state {
            tracing::debug!(
                "discarding stale geometry built from state {} (current {})",
                state,
                self.chunk_state
            );
            return false;
        }
        self.geometry_state = Some(state);
        true
    }
}

/// Determines which chunk meshes a block edit invalidates.
pub struct MeshInvalidator;

impl MeshInvalidator {
    /// The chunks whose meshes read the voxel at `local_pos` in `edited`.
    ///
    /// The edited chunk is always first. A horizontal neighbour is added when
    /// the voxel lies on the boundary plane that neighbour's halo samples.
    /// Vertical edits stay within the column and need no extra chunk.
    pub fn invalidate(
        edited: ChunkCoord,
        local_pos: (usize, usize, usize),
        shape: SectionShape,
    ) -> Vec<ChunkCoord> {
        let mut dirty = vec![edited];
        let (x, _, z) = local_pos;

        if x == 0 {
            dirty.push(edited.neighbor(ChunkSlot::West));
        }
        if x + 1 == shape.x {
            dirty.push(edited.neighbor(ChunkSlot::East));
        }
        if z == 0 {
            dirty.push(edited.neighbor(ChunkSlot::North));
        }
        if z + 1 == shape.z {
            dirty.push(edited.neighbor(ChunkSlot::South));
        }

        dirty
    }
}
