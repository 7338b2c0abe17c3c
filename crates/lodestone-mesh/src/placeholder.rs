//! Placeholder geometry for chunk columns that have no mesh to show: a grid
//! floor and ceiling at the level's vertical bounds.

use crate::block_mesh::BlockMeshVertex;
use crate::chunk_mesh::ChunkMeshBuffers;
use crate::packed::encode_vertex;
use crate::resource_pack::ResourcePack;

/// Texture drawn for chunks that do not exist.
pub const EMPTY_CHUNK_TEXTURE: &str = "amulet_ui/chunk_grid_null";
/// Texture drawn for chunks that failed to load or mesh, and for chunks still
/// waiting on a mesh.
pub const ERROR_CHUNK_TEXTURE: &str = "amulet_ui/chunk_grid_error";

/// Plane offset that keeps the grid from z-fighting with blocks at the bounds.
const PLANE_INSET: f32 = 0.01;

/// Footprint of one chunk column in blocks.
const CHUNK_WIDTH: f32 = 16.0;

/// Vertical extent of the level, used to place the grid planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelBounds {
    pub floor_y: f32,
    pub ceiling_y: f32,
}

impl LevelBounds {
    pub fn new(floor_y: f32, ceiling_y: f32) -> Self {
        Self { floor_y, ceiling_y }
    }
}

/// Grid for a chunk that does not exist.
pub fn empty_chunk_geometry<R: ResourcePack + ?Sized>(
    pack: &R,
    bounds: LevelBounds,
    cx: i64,
    cz: i64,
) -> ChunkMeshBuffers {
    chunk_grid(pack, bounds, EMPTY_CHUNK_TEXTURE, checker(cx, cz, [0.1; 3], [0.0; 3]))
}

/// Grid for a chunk whose data or mesh could not be produced.
pub fn error_chunk_geometry<R: ResourcePack + ?Sized>(
    pack: &R,
    bounds: LevelBounds,
    cx: i64,
    cz: i64,
) -> ChunkMeshBuffers {
    chunk_grid(pack, bounds, ERROR_CHUNK_TEXTURE, checker(cx, cz, [0.5; 3], [0.6; 3]))
}

/// Grid shown while a chunk's mesh is being built.
pub fn pending_chunk_geometry<R: ResourcePack + ?Sized>(
    pack: &R,
    bounds: LevelBounds,
    cx: i64,
    cz: i64,
) -> ChunkMeshBuffers {
    chunk_grid(pack, bounds, ERROR_CHUNK_TEXTURE, checker(cx, cz, [1.0; 3], [0.8; 3]))
}

fn checker(cx: i64, cz: i64, odd: [f32; 3], even: [f32; 3]) -> [f32; 3] {
    if (cx + cz).rem_euclid(2) == 1 { odd } else { even }
}

fn chunk_grid<R: ResourcePack + ?Sized>(
    pack: &R,
    bounds: LevelBounds,
    texture: &str,
    tint: [f32; 3],
) -> ChunkMeshBuffers {
    let atlas = pack.texture_bounds(texture);
    let mut buffers = ChunkMeshBuffers::new();
    for height in [bounds.floor_y - PLANE_INSET, bounds.ceiling_y + PLANE_INSET] {
        for vertex in plane_vertices(height, tint) {
            buffers
                .opaque
                .extend_from_slice(encode_vertex(&vertex, [0.0; 3], atlas, 1.0).as_bytes());
        }
    }
    buffers
}

/// A double-sided 16×16 plane at `height`, two triangles per side. UVs run
/// in blocks so the grid texture repeats once per block.
fn plane_vertices(height: f32, tint: [f32; 3]) -> Vec<BlockMeshVertex> {
    let w = CHUNK_WIDTH;
    let sides: [[(f32, f32); 4]; 2] = [
        [(0.0, 0.0), (w, 0.0), (w, w), (0.0, w)],
        [(0.0, w), (w, w), (w, 0.0), (0.0, 0.0)],
    ];
    let uvs = [(0.0, 0.0), (w, 0.0), (w, w), (0.0, w)];

    let mut vertices = Vec::with_capacity(12);
    for corners in sides {
        for i in [0, 1, 2, 0, 2, 3] {
            let (x, z) = corners[i];
            let (u, v) = uvs[i];
            vertices.push(BlockMeshVertex::new([x, height, z], [u, v], tint));
        }
    }
    vertices
}
