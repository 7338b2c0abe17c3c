//! Chunk mesher: turns one chunk column plus its horizontal neighbours into
//! opaque and translucent vertex buffers.
//!
//! Each section of the centre column is processed on its own:
//!
//! 1. A [`TransparencyHalo`] is filled from the section itself, the sections
//!    directly above and below it in the same column, and the sections at the
//!    same height in the four neighbour columns. Cells whose source is absent
//!    stay [`BlockMeshTransparency::Partial`], so faces towards unloaded
//!    chunks are drawn.
//! 2. Every voxel's block mesh is emitted. The `None` part is always drawn;
//!    each directional part is culled against the halo cell it faces.
//!
//! Sections are visited in ascending `cy` and voxels in `x`, `y`, `z` order,
//! so identical inputs always give byte-identical buffers.

use std::sync::Arc;

use lodestone_block::{BlockComponentData, BlockPalette, IndexArray3D, SectionShape};

use crate::block_mesh::{BlockMesh, BlockMeshPart, BlockMeshTransparency};
use crate::chunk_mesh::ChunkMeshBuffers;
use crate::cull_direction::CullDirection;
use crate::error::MeshError;
use crate::halo::TransparencyHalo;
use crate::neighborhood::{ChunkNeighbors, ChunkSlot};
use crate::packed::encode_vertex;
use crate::resource_pack::ResourcePack;

/// Returns `true` if a face of a block with transparency `own` is hidden by a
/// neighbouring block with transparency `neighbor`.
pub fn is_face_culled(own: BlockMeshTransparency, neighbor: BlockMeshTransparency) -> bool {
    match neighbor {
        BlockMeshTransparency::FullOpaque => true,
        BlockMeshTransparency::FullTranslucent => own == BlockMeshTransparency::FullTranslucent,
        BlockMeshTransparency::Partial => false,
    }
}

// ---------------------------------------------------------------------------
// MeshLookaside
// ---------------------------------------------------------------------------

/// Palette index → resolved mesh for one chunk, scoped to one meshing call.
///
/// Repeated voxels of the same type reuse the resolved mesh instead of going
/// back to the resource pack.
struct MeshLookaside<'a> {
    slot: ChunkSlot,
    palette: &'a BlockPalette,
    meshes: Vec<Option<Arc<BlockMesh>>>,
}

impl<'a> MeshLookaside<'a> {
    fn new(slot: ChunkSlot, palette: &'a BlockPalette) -> Self {
        Self {
            slot,
            palette,
            meshes: vec![None; palette.len()],
        }
    }

    fn resolve<R: ResourcePack + ?Sized>(
        &mut self,
        pack: &R,
        index: u32,
    ) -> Result<&BlockMesh, MeshError> {
        let side = self.slot;
        let entry = self
            .meshes
            .get_mut(index as usize)
            .ok_or(MeshError::UnknownPaletteIndex { side, index })?;
        if entry.is_none() {
            let stack = self
                .palette
                .index_to_block_stack(index)
                .map_err(|_| MeshError::UnknownPaletteIndex { side, index })?;
            let mesh = pack
                .get_block_model(stack)
                .map_err(|source| MeshError::ModelResolution {
                    stack: stack.clone(),
                    source,
                })?;
            *entry = Some(mesh);
        }
        entry
            .as_deref()
            .ok_or(MeshError::UnknownPaletteIndex { side, index })
    }

    fn transparency<R: ResourcePack + ?Sized>(
        &mut self,
        pack: &R,
        index: u32,
    ) -> Result<BlockMeshTransparency, MeshError> {
        Ok(self.resolve(pack, index)?.transparency)
    }
}

/// A neighbour chunk and its lookaside.
struct NeighborSource<'a> {
    chunk: &'a BlockComponentData,
    lookaside: MeshLookaside<'a>,
}

// ---------------------------------------------------------------------------
// ChunkMesher
// ---------------------------------------------------------------------------

/// Meshes chunk columns against one resource pack.
///
/// A mesher holds no state between calls; one value can be shared freely or
/// created per call.
pub struct ChunkMesher<'p, R: ?Sized> {
    pack: &'p R,
}

impl<'p, R: ResourcePack + ?Sized> ChunkMesher<'p, R> {
    pub fn new(pack: &'p R) -> Self {
        Self { pack }
    }

    /// Builds the vertex buffers of `center`.
    ///
    /// # Errors
    ///
    /// - [`MeshError::ShapeMismatch`] if a present neighbour's section shape
    ///   differs from the centre's, checked before any geometry is produced.
    /// - [`MeshError::ModelResolution`] if the resource pack fails to build a
    ///   block model.
    /// - [`MeshError::UnknownPaletteIndex`], [`MeshError::TextureIndex`] or
    ///   [`MeshError::VertexIndex`] for malformed inputs.
    pub fn build(
        &self,
        center: &BlockComponentData,
        neighbors: &ChunkNeighbors<'_>,
    ) -> Result<ChunkMeshBuffers, MeshError> {
        let shape = center.section_shape();
        for (side, chunk) in neighbors.present() {
            let found = chunk.section_shape();
            if found != shape {
                return Err(MeshError::ShapeMismatch {
                    side,
                    expected: shape,
                    found,
                });
            }
        }

        tracing::debug!(
            "meshing chunk: {} sections of {}, {} neighbours present",
            center.sections().len(),
            shape,
            neighbors.count()
        );

        let mut center_lookaside = MeshLookaside::new(ChunkSlot::Center, center.palette());
        let mut sides: [Option<NeighborSource<'_>>; 4] = ChunkSlot::HORIZONTAL.map(|slot| {
            neighbors.get(slot).map(|chunk| NeighborSource {
                chunk,
                lookaside: MeshLookaside::new(slot, chunk.palette()),
            })
        });

        let mut buffers = ChunkMeshBuffers::new();
        let mut halo = TransparencyHalo::new(shape);

        for (cy, section) in center.sections().iter() {
            tracing::trace!("meshing section cy={}", cy);
            halo.reset();
            self.fill_interior(&mut halo, section, &mut center_lookaside)?;

            // The extreme keys have no section beyond them.
            if let Some(above) = cy.checked_add(1).and_then(|up| center.sections().get(up)) {
                self.fill_face(&mut halo, CullDirection::Up, above, &mut center_lookaside)?;
            }
            if let Some(below) = cy.checked_sub(1).and_then(|down| center.sections().get(down)) {
                self.fill_face(&mut halo, CullDirection::Down, below, &mut center_lookaside)?;
            }
            for (slot, source) in ChunkSlot::HORIZONTAL.into_iter().zip(sides.iter_mut()) {
                let Some(source) = source else {
                    continue;
                };
                let Some(neighbor_section) = source.chunk.sections().get(cy) else {
                    continue;
                };
                self.fill_face(
                    &mut halo,
                    halo_face(slot),
                    neighbor_section,
                    &mut source.lookaside,
                )?;
            }

            self.emit_section(&mut buffers, &halo, cy, section, &mut center_lookaside)?;
        }

        tracing::debug!(
            "meshed chunk: {} opaque and {} translucent vertices",
            buffers.opaque_vertex_count(),
            buffers.translucent_vertex_count()
        );
        Ok(buffers)
    }

    fn fill_interior(
        &self,
        halo: &mut TransparencyHalo,
        section: &IndexArray3D,
        lookaside: &mut MeshLookaside<'_>,
    ) -> Result<(), MeshError> {
        let shape = section.shape();
        for x in 0..shape.x {
            for y in 0..shape.y {
                for z in 0..shape.z {
                    let value = lookaside.transparency(self.pack, section.get(x, y, z))?;
                    halo.set(x + 1, y + 1, z + 1, value);
                }
            }
        }
        Ok(())
    }

    /// Fills the halo border on side `face` from the nearest boundary plane
    /// of `source`, the section adjacent on that side.
    fn fill_face(
        &self,
        halo: &mut TransparencyHalo,
        face: CullDirection,
        source: &IndexArray3D,
        lookaside: &mut MeshLookaside<'_>,
    ) -> Result<(), MeshError> {
        let SectionShape { x: sx, y: sy, z: sz } = halo.shape();
        let pack = self.pack;
        let mut sample =
            |x: usize, y: usize, z: usize| lookaside.transparency(pack, source.get(x, y, z));

        match face {
            CullDirection::Up => {
                for x in 0..sx {
                    for z in 0..sz {
                        halo.set(x + 1, sy + 1, z + 1, sample(x, 0, z)?);
                    }
                }
            }
            CullDirection::Down => {
                for x in 0..sx {
                    for z in 0..sz {
                        halo.set(x + 1, 0, z + 1, sample(x, sy - 1, z)?);
                    }
                }
            }
            CullDirection::North => {
                for x in 0..sx {
                    for y in 0..sy {
                        halo.set(x + 1, y + 1, 0, sample(x, y, sz - 1)?);
                    }
                }
            }
            CullDirection::South => {
                for x in 0..sx {
                    for y in 0..sy {
                        halo.set(x + 1, y + 1, sz + 1, sample(x, y, 0)?);
                    }
                }
            }
            CullDirection::East => {
                for y in 0..sy {
                    for z in 0..sz {
                        halo.set(sx + 1, y + 1, z + 1, sample(0, y, z)?);
                    }
                }
            }
            CullDirection::West => {
                for y in 0..sy {
                    for z in 0..sz {
                        halo.set(0, y + 1, z + 1, sample(sx - 1, y, z)?);
                    }
                }
            }
            CullDirection::None => {}
        }
        Ok(())
    }

    fn emit_section(
        &self,
        buffers: &mut ChunkMeshBuffers,
        halo: &TransparencyHalo,
        cy: i64,
        section: &IndexArray3D,
        lookaside: &mut MeshLookaside<'_>,
    ) -> Result<(), MeshError> {
        let shape = section.shape();
        let base_y = cy.saturating_mul(shape.y as i64);
        for x in 0..shape.x {
            for y in 0..shape.y {
                for z in 0..shape.z {
                    let mesh = lookaside.resolve(self.pack, section.get(x, y, z))?;
                    if mesh.is_empty() {
                        continue;
                    }
                    let world_y = base_y.saturating_add(y as i64);
                    let offset = [x as f32, world_y as f32, z as f32];
                    let out = buffers.buffer_for(mesh.transparency);

                    if let Some(part) = mesh.part(CullDirection::None) {
                        self.emit_part(out, mesh, part, offset, CullDirection::None.shading())?;
                    }
                    for direction in CullDirection::DIRECTIONAL {
                        let Some(part) = mesh.part(direction) else {
                            continue;
                        };
                        let Some(step) = direction.offset() else {
                            continue;
                        };
                        if is_face_culled(mesh.transparency, halo.neighbor(x, y, z, step)) {
                            continue;
                        }
                        self.emit_part(out, mesh, part, offset, direction.shading())?;
                    }
                }
            }
        }
        Ok(())
    }

    fn emit_part(
        &self,
        out: &mut Vec<u8>,
        mesh: &BlockMesh,
        part: &BlockMeshPart,
        offset: [f32; 3],
        shading: f32,
    ) -> Result<(), MeshError> {
        for triangle in &part.triangles {
            let texture = mesh
                .textures
                .get(triangle.texture_index)
                .ok_or(MeshError::TextureIndex {
                    index: triangle.texture_index,
                    len: mesh.textures.len(),
                })?;
            let bounds = self.pack.texture_bounds(texture);
            for index in triangle.vertex_indices() {
                let vertex = part.verts.get(index).ok_or(MeshError::VertexIndex {
                    index,
                    len: part.verts.len(),
                })?;
                out.extend_from_slice(encode_vertex(vertex, offset, bounds, shading).as_bytes());
            }
        }
        Ok(())
    }
}

/// The halo side a horizontal neighbour fills.
fn halo_face(slot: ChunkSlot) -> CullDirection {
    match slot {
        ChunkSlot::North => CullDirection::North,
        ChunkSlot::East => CullDirection::East,
        ChunkSlot::South => CullDirection::South,
        ChunkSlot::West => CullDirection::West,
        ChunkSlot::Center => CullDirection::None,
    }
}

/// Builds the vertex buffers of `center` given its optional horizontal
/// neighbours.
pub fn build_chunk_mesh<R: ResourcePack + ?Sized>(
    pack: &R,
    center: &BlockComponentData,
    north: Option<&BlockComponentData>,
    east: Option<&BlockComponentData>,
    south: Option<&BlockComponentData>,
    west: Option<&BlockComponentData>,
) -> Result<ChunkMeshBuffers, MeshError> {
    let neighbors = ChunkNeighbors {
        north,
        east,
        south,
        west,
    };
    ChunkMesher::new(pack).build(center, &neighbors)
}
