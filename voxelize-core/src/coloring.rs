/// Per-voxel scalars that drive the color scale of the 3D view
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::VoxelizeError;

/// Seed of the `Random` mode, fixed so redraws keep their colors
pub const RANDOM_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    #[default]
    #[serde(rename = "Z-coordinate")]
    ZCoordinate,
    #[serde(rename = "Y-coordinate")]
    YCoordinate,
    #[serde(rename = "X-coordinate")]
    XCoordinate,
    #[serde(rename = "Distance from Center")]
    DistanceFromCenter,
    #[serde(rename = "Radial (XY)")]
    RadialXy,
    Random,
}

impl ColorMode {
    pub const ALL: [ColorMode; 6] = [
        ColorMode::ZCoordinate,
        ColorMode::YCoordinate,
        ColorMode::XCoordinate,
        ColorMode::DistanceFromCenter,
        ColorMode::RadialXy,
        ColorMode::Random,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColorMode::ZCoordinate => "Z-coordinate",
            ColorMode::YCoordinate => "Y-coordinate",
            ColorMode::XCoordinate => "X-coordinate",
            ColorMode::DistanceFromCenter => "Distance from Center",
            ColorMode::RadialXy => "Radial (XY)",
            ColorMode::Random => "Random",
        }
    }

    /// Title of the color bar
    pub fn title(self) -> &'static str {
        match self {
            ColorMode::ZCoordinate => "Z",
            ColorMode::YCoordinate => "Y",
            ColorMode::XCoordinate => "X",
            ColorMode::DistanceFromCenter => "Distance",
            ColorMode::RadialXy => "Radial XY",
            ColorMode::Random => "Random",
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ColorMode {
    type Err = VoxelizeError;

    /// Accepts the display label or a short alias (`z`, `distance`, `radial`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let mode = match key.as_str() {
            "z" | "z-coordinate" => ColorMode::ZCoordinate,
            "y" | "y-coordinate" => ColorMode::YCoordinate,
            "x" | "x-coordinate" => ColorMode::XCoordinate,
            "distance" | "distance from center" => ColorMode::DistanceFromCenter,
            "radial" | "radial (xy)" | "radial-xy" => ColorMode::RadialXy,
            "random" => ColorMode::Random,
            _ => {
                return Err(VoxelizeError::InvalidParameter {
                    name: "color mode",
                    reason: format!("unknown mode '{}'", s),
                })
            }
        };
        Ok(mode)
    }
}

/// Compute one scalar per occupied cell
pub fn color_values(points: &[[usize; 3]], mode: ColorMode) -> Vec<f64> {
    let axis_values = |axis: usize| -> Vec<f64> { points.iter().map(|p| p[axis] as f64).collect() };

    match mode {
        ColorMode::ZCoordinate => axis_values(2),
        ColorMode::YCoordinate => axis_values(1),
        ColorMode::XCoordinate => axis_values(0),
        ColorMode::DistanceFromCenter => {
            let c = centroid(points);
            points
                .iter()
                .map(|p| {
                    let d: f64 = (0..3).map(|a| (p[a] as f64 - c[a]).powi(2)).sum();
                    d.sqrt()
                })
                .collect()
        }
        ColorMode::RadialXy => {
            let c = centroid(points);
            points
                .iter()
                .map(|p| ((p[0] as f64 - c[0]).powi(2) + (p[1] as f64 - c[1]).powi(2)).sqrt())
                .collect()
        }
        ColorMode::Random => {
            let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
            points.iter().map(|_| rng.gen::<f64>()).collect()
        }
    }
}

fn centroid(points: &[[usize; 3]]) -> [f64; 3] {
    if points.is_empty() {
        return [0.0; 3];
    }
    let n = points.len() as f64;
    let mut sum = [0.0; 3];
    for p in points {
        for axis in 0..3 {
            sum[axis] += p[axis] as f64;
        }
    }
    sum.map(|s| s / n)
}
