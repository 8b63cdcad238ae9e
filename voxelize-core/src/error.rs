/// Error kinds surfaced by each step of the voxelization pipeline
use thiserror::Error;

use crate::slice::Axis;

#[derive(Debug, Error)]
pub enum VoxelizeError {
    #[error("Error loading STL file: {0}")]
    Load(String),
    #[error("Error voxelizing mesh: {0}")]
    Voxelize(String),
    #[error("No voxels found in the mesh")]
    EmptyGrid,
    #[error("{axis}-slice index {index} is out of range (grid has {len} slices along {axis})")]
    SliceOutOfRange { axis: Axis, index: usize, len: usize },
    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Invalid settings: {0}")]
    Config(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VoxelizeError>;
