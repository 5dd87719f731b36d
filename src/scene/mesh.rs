use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// Polygon mesh as the editor stores it: shared vertex positions and
/// polygons as ordered vertex index lists of any arity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    #[serde(default)]
    pub polygons: Vec<Vec<u32>>,
}

impl Mesh {
    /// Axis-aligned box with six quad faces.
    pub fn cuboid(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        let vertices = vec![
            [min.x, min.y, min.z],
            [max.x, min.y, min.z],
            [max.x, max.y, min.z],
            [min.x, max.y, min.z],
            [min.x, min.y, max.z],
            [max.x, min.y, max.z],
            [max.x, max.y, max.z],
            [min.x, max.y, max.z],
        ];
        let polygons = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ];
        Self { vertices, polygons }
    }

    pub fn is_triangulated(&self) -> bool {
        self.polygons.iter().all(|p| p.len() == 3)
    }

    /// Index of the first polygon that references a missing vertex.
    pub fn find_invalid_polygon(&self) -> Option<usize> {
        let count = self.vertices.len() as u32;
        self.polygons
            .iter()
            .position(|p| p.iter().any(|&i| i >= count))
    }
}

/// In-place conversion of every polygon to triangles.
///
/// Precondition: none. Postcondition: `mesh.is_triangulated()` holds and
/// `mesh.vertices` is unchanged. Degenerate polygons (fewer than three
/// indices) are dropped.
pub trait Triangulator {
    fn triangulate(&self, mesh: &mut Mesh);
}

/// Fan triangulation around each polygon's first vertex.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanTriangulator;

impl Triangulator for FanTriangulator {
    fn triangulate(&self, mesh: &mut Mesh) {
        if mesh.is_triangulated() {
            return;
        }

        let mut triangles = Vec::with_capacity(mesh.polygons.len() * 2);
        for polygon in &mesh.polygons {
            if polygon.len() < 3 {
                continue;
            }
            for i in 1..polygon.len() - 1 {
                triangles.push(vec![polygon[0], polygon[i], polygon[i + 1]]);
            }
        }
        mesh.polygons = triangles;
    }
}
