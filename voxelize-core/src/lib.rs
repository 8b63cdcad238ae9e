/// Voxelize Core Library - STL to occupancy grid conversion and its views
///
/// This library provides the stateless core: STL intake, voxelization,
/// coloring, slicing, plot descriptions, raster previews and exports.
/// Front ends drive it through a `Session`.

pub mod coloring;
pub mod colormap;
pub mod error;
pub mod export;
pub mod figure;
pub mod geometry;
pub mod info;
pub mod params;
pub mod projection;
pub mod render;
pub mod session;
pub mod slice;
pub mod stl;
pub mod transform;
pub mod voxel;

// Re-export commonly used types
pub use coloring::ColorMode;
pub use colormap::ColorScheme;
pub use error::{Result, VoxelizeError};
pub use figure::Figure;
pub use geometry::{Aabb, Mesh};
pub use info::{GridInfo, MeshInfo, Report};
pub use params::{MarkerSize, Opacity, Settings, SliceParams, ViewParams};
pub use projection::Camera;
pub use session::Session;
pub use slice::{Axis, Slice};
pub use stl::Upload;
pub use transform::{RotationState, Transform};
pub use voxel::{FillMode, OccupancyGrid, Resolution};
