//! Mesh to occupancy grid conversion.
//!
//! The cell size ("pitch") is derived once from the mesh bounds and the
//! requested resolution, and then carried by the grid for every later use.
//! The actual rasterization is done by parry's voxelizer; this module only
//! turns its sparse voxel set into a dense, cropped boolean grid.

use log::{debug, info, warn};
use nalgebra::Point3;
use parry3d::math::Point;
use parry3d::transformation::voxelization::{FillMode as ParryFillMode, VoxelSet};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxelizeError};
use crate::geometry::{Aabb, Mesh};

/// Number of cells along the longest side of the mesh bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Resolution(u32);

impl Resolution {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 200;
    pub const DEFAULT: u32 = 50;

    pub fn new(value: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(VoxelizeError::InvalidParameter {
                name: "resolution",
                reason: format!(
                    "{} is outside {}..={}",
                    value,
                    Self::MIN,
                    Self::MAX
                ),
            })
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for Resolution {
    type Error = VoxelizeError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Resolution> for u32 {
    fn from(resolution: Resolution) -> Self {
        resolution.0
    }
}

/// Which cells count as occupied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// Only cells crossed by the surface
    #[default]
    Surface,
    /// Surface cells plus the enclosed interior
    Solid,
}

impl std::str::FromStr for FillMode {
    type Err = VoxelizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "solid" => Ok(Self::Solid),
            other => Err(VoxelizeError::InvalidParameter {
                name: "fill mode",
                reason: format!("unknown mode '{}', expected surface or solid", other),
            }),
        }
    }
}

impl From<FillMode> for ParryFillMode {
    fn from(mode: FillMode) -> Self {
        match mode {
            FillMode::Surface => ParryFillMode::SurfaceOnly,
            FillMode::Solid => ParryFillMode::FloodFill {
                detect_cavities: false,
            },
        }
    }
}

/// Edge length of one cell: the largest bounding-box extent divided by the resolution
pub fn compute_pitch(bounds: &Aabb, resolution: Resolution) -> Result<f32> {
    let max_extent = bounds.max_extent();
    if !max_extent.is_finite() || max_extent <= 0.0 {
        return Err(VoxelizeError::Voxelize(format!(
            "mesh has a degenerate bounding box (largest extent {})",
            max_extent
        )));
    }
    Ok(max_extent / resolution.get() as f32)
}

/// Dense boolean occupancy grid stored in C order (x slowest, z fastest)
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    shape: [usize; 3],
    pitch: f32,
    origin: Point3<f32>,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(shape: [usize; 3], pitch: f32, origin: Point3<f32>, cells: Vec<bool>) -> Result<Self> {
        let total = shape[0] * shape[1] * shape[2];
        if cells.len() != total {
            return Err(VoxelizeError::Voxelize(format!(
                "grid of shape {:?} needs {} cells, got {}",
                shape,
                total,
                cells.len()
            )));
        }
        Ok(Self {
            shape,
            pitch,
            origin,
            cells,
        })
    }

    /// Build a grid from a list of occupied coordinates
    pub fn from_occupied(shape: [usize; 3], pitch: f32, occupied: &[[usize; 3]]) -> Result<Self> {
        let mut cells = vec![false; shape[0] * shape[1] * shape[2]];
        for &[i, j, k] in occupied {
            if i >= shape[0] || j >= shape[1] || k >= shape[2] {
                return Err(VoxelizeError::Voxelize(format!(
                    "cell ({}, {}, {}) lies outside a grid of shape {:?}",
                    i, j, k, shape
                )));
            }
            cells[(i * shape[1] + j) * shape[2] + k] = true;
        }
        Self::new(shape, pitch, Point3::origin(), cells)
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World position of the centre of cell (0, 0, 0)
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.shape[1] + j) * self.shape[2] + k
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> bool {
        i < self.shape[0]
            && j < self.shape[1]
            && k < self.shape[2]
            && self.cells[self.index(i, j, k)]
    }

    pub fn total_count(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// Fraction of occupied cells, 0 for a grid without cells
    pub fn fill_ratio(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 0.0;
        }
        self.filled_count() as f64 / total as f64
    }

    /// Coordinates of every occupied cell, in storage order
    pub fn occupied(&self) -> Vec<[usize; 3]> {
        let [_, ny, nz] = self.shape;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &filled)| filled)
            .map(|(idx, _)| [idx / (ny * nz), (idx / nz) % ny, idx % nz])
            .collect()
    }
}

/// Voxelize `mesh` so that its longest side spans `resolution` cells
pub fn voxelize(mesh: &Mesh, resolution: Resolution, fill: FillMode) -> Result<OccupancyGrid> {
    if mesh.is_empty() {
        return Err(VoxelizeError::Voxelize("mesh has no faces".to_string()));
    }

    let bounds = mesh.bounds();
    let pitch = compute_pitch(&bounds, resolution)?;
    debug!(
        "voxelizing {} faces at resolution {} (pitch {:.6}, {:?})",
        mesh.faces.len(),
        resolution.get(),
        pitch,
        fill
    );

    let points: Vec<Point<f32>> = mesh
        .vertices
        .iter()
        .map(|v| Point::new(v.x, v.y, v.z))
        .collect();
    let set = VoxelSet::with_voxel_size(&points, &mesh.faces, pitch, fill.into(), false);

    let grid = densify(&set, pitch)?;
    if grid.is_empty() {
        warn!("voxelization produced no occupied cells");
    }
    info!(
        "voxelized into {:?} grid, {} of {} cells filled",
        grid.shape(),
        grid.filled_count(),
        grid.total_count()
    );
    Ok(grid)
}

/// Crop parry's sparse voxel set to the bounding box of its voxels
fn densify(set: &VoxelSet, pitch: f32) -> Result<OccupancyGrid> {
    let coords: Vec<[i64; 3]> = set
        .voxels()
        .iter()
        .map(|v| [v.coords.x as i64, v.coords.y as i64, v.coords.z as i64])
        .collect();

    if coords.is_empty() {
        let origin = Point3::new(set.origin.x, set.origin.y, set.origin.z);
        return OccupancyGrid::new([0, 0, 0], pitch, origin, Vec::new());
    }

    let mut min = [i64::MAX; 3];
    let mut max = [i64::MIN; 3];
    for c in &coords {
        for axis in 0..3 {
            min[axis] = min[axis].min(c[axis]);
            max[axis] = max[axis].max(c[axis]);
        }
    }

    let shape = [0, 1, 2].map(|axis| (max[axis] - min[axis] + 1) as usize);
    let occupied: Vec<[usize; 3]> = coords
        .iter()
        .map(|c| [0, 1, 2].map(|axis| (c[axis] - min[axis]) as usize))
        .collect();

    let mut grid = OccupancyGrid::from_occupied(shape, pitch, &occupied)?;
    grid.origin = Point3::new(
        set.origin.x + min[0] as f32 * set.scale,
        set.origin.y + min[1] as f32 * set.scale,
        set.origin.z + min[2] as f32 * set.scale,
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolution_bounds() {
        assert!(Resolution::new(9).is_err());
        assert!(Resolution::new(201).is_err());
        assert_eq!(Resolution::new(10).unwrap().get(), 10);
        assert_eq!(Resolution::default().get(), 50);
    }

    #[test]
    fn test_pitch_from_bounds() {
        let bounds = Aabb {
            mins: [0.0, 0.0, 0.0],
            maxs: [10.0, 4.0, 2.0],
        };
        let pitch = compute_pitch(&bounds, Resolution::new(50).unwrap()).unwrap();
        assert_relative_eq!(pitch, 0.2);
        assert_relative_eq!(bounds.max_extent() / pitch, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_degenerate_bounds() {
        let bounds = Aabb {
            mins: [1.0; 3],
            maxs: [1.0; 3],
        };
        let result = compute_pitch(&bounds, Resolution::default());
        assert!(matches!(result, Err(VoxelizeError::Voxelize(_))));
    }

    #[test]
    fn test_grid_counts() {
        let grid = OccupancyGrid::from_occupied([2, 3, 4], 0.5, &[[0, 0, 0], [1, 2, 3], [1, 0, 2]]).unwrap();
        assert_eq!(grid.total_count(), 24);
        assert_eq!(grid.filled_count(), 3);
        assert_relative_eq!(grid.fill_ratio(), 3.0 / 24.0);
        assert!(grid.get(1, 2, 3));
        assert!(!grid.get(1, 2, 2));
        assert!(!grid.get(5, 0, 0));
        assert_eq!(grid.occupied(), vec![[0, 0, 0], [1, 0, 2], [1, 2, 3]]);
    }

    #[test]
    fn test_grid_rejects_mismatched_cells() {
        let result = OccupancyGrid::new([2, 2, 2], 1.0, Point3::origin(), vec![false; 7]);
        assert!(result.is_err());
        assert!(OccupancyGrid::from_occupied([1, 1, 1], 1.0, &[[0, 1, 0]]).is_err());
    }

    #[test]
    fn test_empty_grid_ratio() {
        let grid = OccupancyGrid::new([0, 0, 0], 1.0, Point3::origin(), Vec::new()).unwrap();
        assert_eq!(grid.fill_ratio(), 0.0);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_voxelize_empty_mesh() {
        let result = voxelize(&Mesh::default(), Resolution::default(), FillMode::Surface);
        assert!(matches!(result, Err(VoxelizeError::Voxelize(_))));
    }

    #[test]
    fn test_fill_mode_parse() {
        assert_eq!("Solid".parse::<FillMode>().unwrap(), FillMode::Solid);
        assert!("hollow".parse::<FillMode>().is_err());
    }
}
