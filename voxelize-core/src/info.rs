/// Summary panel for a loaded mesh and its voxelization
use std::fmt;

use serde::Serialize;

use crate::geometry::{Aabb, Mesh};
use crate::voxel::OccupancyGrid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshInfo {
    pub vertices: usize,
    pub faces: usize,
    pub volume: f64,
    pub surface_area: f64,
    pub bounds: Aabb,
}

impl MeshInfo {
    pub fn of(mesh: &Mesh) -> Self {
        Self {
            vertices: mesh.vertices.len(),
            faces: mesh.faces.len(),
            volume: mesh.volume(),
            surface_area: mesh.surface_area(),
            bounds: mesh.bounds(),
        }
    }
}

impl fmt::Display for MeshInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Information")?;
        writeln!(f, "  Vertices: {}", self.vertices)?;
        writeln!(f, "  Faces: {}", self.faces)?;
        writeln!(f, "  Volume: {:.4}", self.volume)?;
        writeln!(f, "  Surface Area: {:.4}", self.surface_area)?;
        writeln!(f, "  Bounding Box:")?;
        for (axis, name) in ["X", "Y", "Z"].iter().enumerate() {
            writeln!(
                f,
                "    {}: [{:.2}, {:.2}]",
                name, self.bounds.mins[axis], self.bounds.maxs[axis]
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridInfo {
    pub shape: [usize; 3],
    pub filled: usize,
    pub total: usize,
    pub fill_ratio: f64,
    pub pitch: f32,
}

impl GridInfo {
    pub fn of(grid: &OccupancyGrid) -> Self {
        Self {
            shape: grid.shape(),
            filled: grid.filled_count(),
            total: grid.total_count(),
            fill_ratio: grid.fill_ratio(),
            pitch: grid.pitch(),
        }
    }
}

impl fmt::Display for GridInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [nx, ny, nz] = self.shape;
        writeln!(f, "Voxel Information")?;
        writeln!(f, "  Grid Size: ({}, {}, {})", nx, ny, nz)?;
        writeln!(f, "  Filled Voxels: {}", self.filled)?;
        writeln!(f, "  Total Voxels: {}", self.total)?;
        writeln!(f, "  Fill Ratio: {:.4}", self.fill_ratio)?;
        writeln!(f, "  Voxel Pitch: {:.4}", self.pitch)
    }
}

/// Both panels side by side in the UI, one after the other as text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub mesh: MeshInfo,
    pub grid: GridInfo,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.mesh, self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_info_text() {
        let text = MeshInfo::of(&Mesh::cube(2.0)).to_string();
        assert!(text.contains("Vertices: 8"));
        assert!(text.contains("Faces: 12"));
        assert!(text.contains("Volume: 8.0000"));
        assert!(text.contains("Surface Area: 24.0000"));
        assert!(text.contains("X: [-1.00, 1.00]"));
    }

    #[test]
    fn test_grid_info_text() {
        let grid = OccupancyGrid::from_occupied([2, 2, 2], 0.125, &[[0, 0, 0], [1, 1, 1]]).unwrap();
        let info = GridInfo::of(&grid);
        assert_eq!(info.total, 8);
        assert_eq!(info.filled, 2);
        let text = info.to_string();
        assert!(text.contains("Grid Size: (2, 2, 2)"));
        assert!(text.contains("Fill Ratio: 0.2500"));
        assert!(text.contains("Voxel Pitch: 0.1250"));
    }
}
