/// Indexed triangle mesh and its derived measurements
use nalgebra::{Point3, Vector3};
use serde::Serialize;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub mins: [f32; 3],
    pub maxs: [f32; 3],
}

impl Aabb {
    pub fn extents(&self) -> Vector3<f32> {
        Vector3::new(
            self.maxs[0] - self.mins[0],
            self.maxs[1] - self.mins[1],
            self.maxs[2] - self.mins[2],
        )
    }

    /// Largest side of the box
    pub fn max_extent(&self) -> f32 {
        self.extents().max()
    }
}

/// A triangle mesh with welded vertices
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point3<f32>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn triangle(&self, face: &[u32; 3]) -> [Point3<f32>; 3] {
        [
            self.vertices[face[0] as usize],
            self.vertices[face[1] as usize],
            self.vertices[face[2] as usize],
        ]
    }

    pub fn bounds(&self) -> Aabb {
        let mut mins = [f32::INFINITY; 3];
        let mut maxs = [f32::NEG_INFINITY; 3];
        for v in &self.vertices {
            for axis in 0..3 {
                mins[axis] = mins[axis].min(v[axis]);
                maxs[axis] = maxs[axis].max(v[axis]);
            }
        }
        if self.vertices.is_empty() {
            mins = [0.0; 3];
            maxs = [0.0; 3];
        }
        Aabb { mins, maxs }
    }

    /// Enclosed volume from the signed tetrahedra against the origin.
    /// Negative for inward-facing winding; not meaningful for open meshes.
    pub fn volume(&self) -> f64 {
        let signed: f64 = self
            .faces
            .iter()
            .map(|face| {
                let [a, b, c] = self.triangle(face).map(|p| p.coords.cast::<f64>());
                a.dot(&b.cross(&c))
            })
            .sum();
        signed / 6.0
    }

    pub fn surface_area(&self) -> f64 {
        self.faces
            .iter()
            .map(|face| {
                let [a, b, c] = self.triangle(face).map(|p| p.coords.cast::<f64>());
                (b - a).cross(&(c - a)).norm() * 0.5
            })
            .sum()
    }

    /// Create a closed, outward-facing cube centred at the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let faces = vec![
            // Back
            [0, 2, 1],
            [0, 3, 2],
            // Front
            [4, 5, 6],
            [4, 6, 7],
            // Bottom
            [0, 1, 5],
            [0, 5, 4],
            // Top
            [3, 7, 6],
            [3, 6, 2],
            // Left
            [0, 4, 7],
            [0, 7, 3],
            // Right
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self::new(vertices, faces)
    }
}
