//! Per-block-stack render geometry as produced by a block-model loader.
//!
//! A [`BlockMesh`] holds up to seven optional parts, one per
//! [`CullDirection`]. Parts are in block-local space: a full cube spans
//! `0.0..=1.0` on every axis.

use crate::cull_direction::CullDirection;

/// Culling class of a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockMeshTransparency {
    /// Fills its whole cell and hides every face behind it.
    FullOpaque,
    /// Fills its whole cell but can be seen through (glass, ice).
    FullTranslucent,
    /// Does not fill its cell (air, plants, slabs).
    #[default]
    Partial,
}

/// One vertex of a block-mesh part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockMeshVertex {
    /// Position in block-local space.
    pub coord: [f32; 3],
    /// Texture coordinate within the referenced texture.
    pub texture_coord: [f32; 2],
    /// Base tint before directional shading.
    pub tint: [f32; 3],
}

impl BlockMeshVertex {
    /// Creates a vertex.
    pub const fn new(coord: [f32; 3], texture_coord: [f32; 2], tint: [f32; 3]) -> Self {
        Self {
            coord,
            texture_coord,
            tint,
        }
    }
}

/// A triangle referencing three vertices of its part and one texture slot of
/// its mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockMeshTriangle {
    pub vert_index_a: usize,
    pub vert_index_b: usize,
    pub vert_index_c: usize,
    /// Index into [`BlockMesh::textures`].
    pub texture_index: usize,
}

impl BlockMeshTriangle {
    pub const fn new(a: usize, b: usize, c: usize, texture_index: usize) -> Self {
        Self {
            vert_index_a: a,
            vert_index_b: b,
            vert_index_c: c,
            texture_index,
        }
    }

    /// The three vertex indices in winding order.
    pub fn vertex_indices(&self) -> [usize; 3] {
        [self.vert_index_a, self.vert_index_b, self.vert_index_c]
    }
}

/// Geometry for one cull direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockMeshPart {
    pub verts: Vec<BlockMeshVertex>,
    pub triangles: Vec<BlockMeshTriangle>,
}

impl BlockMeshPart {
    /// Creates a part from vertices and triangles.
    pub fn new(verts: Vec<BlockMeshVertex>, triangles: Vec<BlockMeshTriangle>) -> Self {
        Self { verts, triangles }
    }

    /// Appends a quad as two triangles `(0, 1, 2)` and `(0, 2, 3)`.
    pub fn push_quad(&mut self, verts: [BlockMeshVertex; 4], texture_index: usize) {
        let base = self.verts.len();
        self.verts.extend_from_slice(&verts);
        self.triangles
            .push(BlockMeshTriangle::new(base, base + 1, base + 2, texture_index));
        self.triangles
            .push(BlockMeshTriangle::new(base, base + 2, base + 3, texture_index));
    }
}

/// Render geometry for one block stack.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockMesh {
    /// How this block culls its neighbours' faces.
    pub transparency: BlockMeshTransparency,
    /// Texture identifiers referenced by triangle `texture_index`.
    pub textures: Vec<String>,
    /// Geometry indexed by [`CullDirection::index`].
    pub parts: [Option<BlockMeshPart>; 7],
}

// Corners of each cube face, wound counter-clockwise seen from outside.
const CUBE_FACES: [(CullDirection, [[f32; 3]; 4]); 6] = [
    (
        CullDirection::Up,
        [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    ),
    (
        CullDirection::Down,
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    ),
    (
        CullDirection::North,
        [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    ),
    (
        CullDirection::South,
        [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    ),
    (
        CullDirection::East,
        [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    ),
    (
        CullDirection::West,
        [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    ),
];

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

impl BlockMesh {
    /// Creates a mesh from its parts.
    pub fn new(
        transparency: BlockMeshTransparency,
        textures: Vec<String>,
        parts: [Option<BlockMeshPart>; 7],
    ) -> Self {
        Self {
            transparency,
            textures,
            parts,
        }
    }

    /// A mesh with no geometry that never culls anything (air).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The part for `direction`, if the mesh has one.
    pub fn part(&self, direction: CullDirection) -> Option<&BlockMeshPart> {
        self.parts[direction.index()].as_ref()
    }

    /// Replaces the part for `direction`.
    pub fn set_part(&mut self, direction: CullDirection, part: BlockMeshPart) {
        self.parts[direction.index()] = Some(part);
    }

    /// Total triangle count across all parts.
    pub fn triangle_count(&self) -> usize {
        self.parts
            .iter()
            .flatten()
            .map(|part| part.triangles.len())
            .sum()
    }

    /// Returns `true` if no part holds a triangle.
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// A unit cube using one texture on every face.
    pub fn cube(texture: &str, transparency: BlockMeshTransparency, tint: [f32; 3]) -> Self {
        Self::cube_with_textures([texture; 6], transparency, tint)
    }

    /// A unit cube with one texture per face, ordered Up, Down, North,
    /// South, East, West.
    ///
    /// Repeated identifiers share a texture slot.
    pub fn cube_with_textures(
        textures: [&str; 6],
        transparency: BlockMeshTransparency,
        tint: [f32; 3],
    ) -> Self {
        let mut mesh = Self {
            transparency,
            ..Self::default()
        };
        for ((direction, corners), texture) in CUBE_FACES.iter().zip(textures) {
            let texture_index = mesh.texture_slot(texture);
            let mut part = BlockMeshPart::default();
            part.push_quad(
                std::array::from_fn(|i| BlockMeshVertex::new(corners[i], QUAD_UVS[i], tint)),
                texture_index,
            );
            mesh.set_part(*direction, part);
        }
        mesh
    }

    /// Two crossed diagonal quads in the never-culled part, as used for
    /// plants. Each quad is emitted for both sides.
    pub fn cross(texture: &str, tint: [f32; 3]) -> Self {
        let diagonals = [
            [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
            [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
        ];
        let mut part = BlockMeshPart::default();
        for corners in diagonals {
            let front: [BlockMeshVertex; 4] =
                std::array::from_fn(|i| BlockMeshVertex::new(corners[i], QUAD_UVS[i], tint));
            let mut back = front;
            back.reverse();
            part.push_quad(front, 0);
            part.push_quad(back, 0);
        }
        let mut mesh = Self {
            transparency: BlockMeshTransparency::Partial,
            textures: vec![texture.to_string()],
            ..Self::default()
        };
        mesh.set_part(CullDirection::None, part);
        mesh
    }

    /// The opaque cube drawn for block stacks the loader cannot model.
    pub fn missing_block(texture: &str) -> Self {
        Self::cube(texture, BlockMeshTransparency::FullOpaque, [1.0, 1.0, 1.0])
    }

    fn texture_slot(&mut self, texture: &str) -> usize {
        match self.textures.iter().position(|t| t == texture) {
            Some(index) => index,
            None => {
                self.textures.push(texture.to_string());
                self.textures.len() - 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(part: &BlockMeshPart) -> [f32; 3] {
        let tri = part.triangles[0];
        let a = part.verts[tri.vert_index_a].coord;
        let b = part.verts[tri.vert_index_b].coord;
        let c = part.verts[tri.vert_index_c].coord;
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ]
    }

    #[test]
    fn test_cube_faces_wind_outwards() {
        let cube = BlockMesh::cube("stone", BlockMeshTransparency::FullOpaque, [1.0; 3]);
        for dir in CullDirection::DIRECTIONAL {
            let part = cube.part(dir).unwrap();
            let (dx, dy, dz) = dir.offset().unwrap();
            let n = face_normal(part);
            assert_eq!(n, [dx as f32, dy as f32, dz as f32], "face {dir}");
        }
    }

    #[test]
    fn test_cube_has_twelve_triangles_and_no_none_part() {
        let cube = BlockMesh::cube("stone", BlockMeshTransparency::FullOpaque, [1.0; 3]);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.part(CullDirection::None).is_none());
        assert_eq!(cube.textures, vec!["stone".to_string()]);
    }

    #[test]
    fn test_cube_with_textures_dedups_slots() {
        let cube = BlockMesh::cube_with_textures(
            ["grass_top", "dirt", "grass_side", "grass_side", "grass_side", "grass_side"],
            BlockMeshTransparency::FullOpaque,
            [1.0; 3],
        );
        assert_eq!(cube.textures.len(), 3);
        let up = cube.part(CullDirection::Up).unwrap();
        let west = cube.part(CullDirection::West).unwrap();
        assert_eq!(cube.textures[up.triangles[0].texture_index], "grass_top");
        assert_eq!(cube.textures[west.triangles[0].texture_index], "grass_side");
    }

    #[test]
    fn test_cross_is_partial_and_unculled() {
        let plant = BlockMesh::cross("poppy", [1.0; 3]);
        assert_eq!(plant.transparency, BlockMeshTransparency::Partial);
        assert_eq!(plant.part(CullDirection::None).unwrap().triangles.len(), 8);
        for dir in CullDirection::DIRECTIONAL {
            assert!(plant.part(dir).is_none());
        }
    }

    #[test]
    fn test_empty_mesh_is_partial() {
        let air = BlockMesh::empty();
        assert!(air.is_empty());
        assert_eq!(air.transparency, BlockMeshTransparency::Partial);
    }
}
