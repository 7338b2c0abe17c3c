//! Chunk meshing: converts palette-indexed block columns into GPU-ready vertex
//! buffers, culling faces against neighbouring blocks and chunks.

pub mod async_mesh;
pub mod block_mesh;
pub mod chunk_mesh;
pub mod cull_direction;
pub mod error;
pub mod halo;
pub mod invalidation;
pub mod mesher;
pub mod neighborhood;
pub mod packed;
pub mod placeholder;
pub mod resource_pack;
pub mod vertex_format;

pub use async_mesh::{MeshingPipeline, MeshingResult, MeshingTask};
pub use block_mesh::{
    BlockMesh, BlockMeshPart, BlockMeshTransparency, BlockMeshTriangle, BlockMeshVertex,
};
pub use chunk_mesh::ChunkMeshBuffers;
pub use cull_direction::CullDirection;
pub use error::MeshError;
pub use halo::TransparencyHalo;
pub use invalidation::{ChunkGeometryState, MeshInvalidator};
pub use mesher::{ChunkMesher, build_chunk_mesh, is_face_culled};
pub use neighborhood::{ChunkCoord, ChunkNeighbors, ChunkSlot};
pub use packed::{ChunkVertex, VERTEX_FLOATS, VERTEX_STRIDE, decode_vertices, encode_vertex};
pub use placeholder::{
    EMPTY_CHUNK_TEXTURE, ERROR_CHUNK_TEXTURE, LevelBounds, empty_chunk_geometry,
    error_chunk_geometry, pending_chunk_geometry,
};
pub use resource_pack::{
    BlockModelLoader, FULL_ATLAS_BOUNDS, ModelLoadError, ResourcePack, ResourcePackCache,
    TextureBounds,
};
pub use vertex_format::{CHUNK_VERTEX_ATTRIBUTES, CHUNK_VERTEX_LAYOUT, chunk_vertex_buffer_layout};
