//! Display parameters and the settings file.
//!
//! None of these values affect the occupancy grid except `resolution` and
//! `fill`; the rest only change how a computed grid is drawn.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coloring::ColorMode;
use crate::colormap::ColorScheme;
use crate::error::{Result, VoxelizeError};
use crate::slice::Axis;
use crate::voxel::{FillMode, Resolution};

/// Marker opacity, 0.1 to 1.0 in steps of 0.1
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Opacity(f64);

impl Opacity {
    pub const MIN: f64 = 0.1;
    pub const MAX: f64 = 1.0;
    pub const STEP: f64 = 0.1;

    /// Validates the range and snaps to the nearest step
    pub fn new(value: f64) -> Result<Self> {
        if !(Self::MIN - 1e-9..=Self::MAX + 1e-9).contains(&value) {
            return Err(VoxelizeError::InvalidParameter {
                name: "opacity",
                reason: format!("{} is outside {}..={}", value, Self::MIN, Self::MAX),
            });
        }
        let snapped = (value / Self::STEP).round() * Self::STEP;
        Ok(Self(snapped.clamp(Self::MIN, Self::MAX)))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(0.8)
    }
}

impl TryFrom<f64> for Opacity {
    type Error = VoxelizeError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Opacity> for f64 {
    fn from(opacity: Opacity) -> Self {
        opacity.0
    }
}

/// Marker size in pixels, 1 to 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MarkerSize(u32);

impl MarkerSize {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;

    pub fn new(value: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(VoxelizeError::InvalidParameter {
                name: "marker size",
                reason: format!("{} is outside {}..={}", value, Self::MIN, Self::MAX),
            })
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for MarkerSize {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<u32> for MarkerSize {
    type Error = VoxelizeError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MarkerSize> for u32 {
    fn from(size: MarkerSize) -> Self {
        size.0
    }
}

/// How the 3D point cloud is drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewParams {
    pub color_scheme: ColorScheme,
    pub color_mode: ColorMode,
    pub opacity: Opacity,
    pub marker_size: MarkerSize,
}

/// Which cross-section to show and how
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceParams {
    pub axis: Axis,
    /// Middle slice when unset
    pub index: Option<usize>,
    pub color_scheme: ColorScheme,
}

/// Everything a user can choose, loadable from a JSON file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resolution: Resolution,
    pub fill: FillMode,
    pub view: ViewParams,
    pub slice: SliceParams,
}

impl Settings {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
