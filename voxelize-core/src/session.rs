//! One user's interaction: an uploaded mesh and the grid computed from it.
//!
//! Every step returns its own error kind and a failed step stops the ones
//! after it. Nothing is shared between sessions.

use log::{error, info};

use crate::error::Result;
use crate::export;
use crate::figure::{self, Figure};
use crate::geometry::Mesh;
use crate::info::{GridInfo, MeshInfo, Report};
use crate::params::{SliceParams, ViewParams};
use crate::slice::{self, Axis, Slice};
use crate::stl::{self, Upload};
use crate::voxel::{self, FillMode, OccupancyGrid, Resolution};

#[derive(Debug)]
pub struct Session {
    stem: String,
    mesh: Mesh,
    grid: OccupancyGrid,
    resolution: Resolution,
    fill: FillMode,
}

impl Session {
    /// Load the upload and voxelize it
    pub fn open(upload: &Upload, resolution: Resolution, fill: FillMode) -> Result<Self> {
        let mesh = stl::load_upload(upload).inspect_err(|e| error!("{}", e))?;
        Self::from_mesh(upload.stem(), mesh, resolution, fill)
    }

    pub fn from_mesh(stem: &str, mesh: Mesh, resolution: Resolution, fill: FillMode) -> Result<Self> {
        let grid = voxel::voxelize(&mesh, resolution, fill).inspect_err(|e| error!("{}", e))?;
        Ok(Self {
            stem: stem.to_string(),
            mesh,
            grid,
            resolution,
            fill,
        })
    }

    /// Recompute the grid from scratch; on failure the previous grid is kept
    pub fn revoxelize(&mut self, resolution: Resolution, fill: FillMode) -> Result<()> {
        if resolution == self.resolution && fill == self.fill {
            return Ok(());
        }
        self.grid = voxel::voxelize(&self.mesh, resolution, fill).inspect_err(|e| error!("{}", e))?;
        self.resolution = resolution;
        self.fill = fill;
        info!("{}: revoxelized at resolution {}", self.stem, resolution.get());
        Ok(())
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn fill(&self) -> FillMode {
        self.fill
    }

    pub fn report(&self) -> Report {
        Report {
            mesh: MeshInfo::of(&self.mesh),
            grid: GridInfo::of(&self.grid),
        }
    }

    pub fn scatter(&self, params: &ViewParams) -> Result<Figure> {
        figure::scatter3d(&self.grid, params)
    }

    pub fn slice(&self, params: &SliceParams) -> Result<Slice> {
        slice::extract(&self.grid, params.axis, params.index)
    }

    pub fn heatmap(&self, params: &SliceParams) -> Result<Figure> {
        let slice = self.slice(params)?;
        Ok(figure::heatmap(&slice, params.color_scheme))
    }

    /// Highest valid slice index along `axis`, `None` for an empty grid
    pub fn max_slice_index(&self, axis: Axis) -> Option<usize> {
        slice::slice_count(&self.grid, axis).checked_sub(1)
    }

    pub fn export_npy(&self) -> Result<Vec<u8>> {
        export::npy_bytes(&self.grid)
    }

    pub fn export_csv(&self) -> Result<String> {
        export::csv_string(&self.grid)
    }

    pub fn voxels_file_name(&self) -> String {
        export::voxels_file_name(&self.stem)
    }

    pub fn coordinates_file_name(&self) -> String {
        export::coordinates_file_name(&self.stem)
    }
}
