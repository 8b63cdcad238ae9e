//! Plot descriptions in plotly's JSON figure schema.
//!
//! The browser front end hands these straight to `Plotly.newPlot`, so field
//! names follow plotly's attribute names rather than Rust conventions.

use serde::Serialize;

use crate::coloring::color_values;
use crate::colormap::ColorScheme;
use crate::error::{Result, VoxelizeError};
use crate::params::ViewParams;
use crate::slice::Slice;
use crate::voxel::OccupancyGrid;

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter3d(Scatter3d),
    Heatmap(Heatmap),
}

#[derive(Debug, Clone, Serialize)]
pub struct Scatter3d {
    pub mode: &'static str,
    pub x: Vec<usize>,
    pub y: Vec<usize>,
    pub z: Vec<usize>,
    pub marker: Marker,
    pub text: Vec<String>,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub size: u32,
    pub color: Vec<f64>,
    pub colorscale: &'static str,
    pub opacity: f64,
    pub showscale: bool,
    pub colorbar: ColorBar,
    pub line: MarkerLine,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLine {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    pub z: Vec<Vec<u8>>,
    pub colorscale: &'static str,
    pub zmin: u8,
    pub zmax: u8,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: None,
            font: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaleanchor: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
    pub aspectmode: &'static str,
    pub camera: SceneCamera,
    pub bgcolor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneCamera {
    pub eye: Eye,
}

#[derive(Debug, Clone, Serialize)]
pub struct Eye {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    pub width: u32,
    pub height: u32,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
}

fn axis(title: &str) -> Axis {
    Axis {
        title: Title::plain(title),
        scaleanchor: None,
    }
}

/// Interactive point cloud of the occupied cells
pub fn scatter3d(grid: &OccupancyGrid, params: &ViewParams) -> Result<Figure> {
    let points = grid.occupied();
    if points.is_empty() {
        return Err(VoxelizeError::EmptyGrid);
    }

    let color_title = params.color_mode.title();
    let trace = Scatter3d {
        mode: "markers",
        x: points.iter().map(|p| p[0]).collect(),
        y: points.iter().map(|p| p[1]).collect(),
        z: points.iter().map(|p| p[2]).collect(),
        marker: Marker {
            size: params.marker_size.get(),
            color: color_values(&points, params.color_mode),
            colorscale: params.color_scheme.name(),
            opacity: params.opacity.get(),
            showscale: true,
            colorbar: ColorBar {
                title: Title::plain(color_title),
            },
            line: MarkerLine {
                width: 0.5,
                color: "rgba(0,0,0,0.1)",
            },
        },
        text: points
            .iter()
            .map(|p| format!("Voxel ({},{},{})", p[0], p[1], p[2]))
            .collect(),
        hovertemplate: format!(
            "<b>Voxel</b><br>X: %{{x}}<br>Y: %{{y}}<br>Z: %{{z}}<br>{}: %{{marker.color:.2f}}<extra></extra>",
            color_title
        ),
    };

    Ok(Figure {
        data: vec![Trace::Scatter3d(trace)],
        layout: Layout {
            title: Title::plain(format!(
                "Voxelized STL Model ({} voxels)",
                thousands(points.len())
            )),
            scene: Some(Scene {
                xaxis: axis("X Coordinate"),
                yaxis: axis("Y Coordinate"),
                zaxis: axis("Z Coordinate"),
                aspectmode: "cube",
                camera: SceneCamera {
                    eye: Eye {
                        x: 1.5,
                        y: 1.5,
                        z: 1.2,
                    },
                },
                bgcolor: "rgba(240,240,240,0.1)",
            }),
            xaxis: None,
            yaxis: None,
            width: 900,
            height: 700,
            paper_bgcolor: "white",
            plot_bgcolor: "white",
        },
    })
}

/// Heatmap of one cross-section; rows run along the y axis of the plot
pub fn heatmap(slice: &Slice, scheme: ColorScheme) -> Figure {
    let (row_axis, col_axis) = slice.axis.remaining();
    let trace = Heatmap {
        z: slice.to_rows(),
        colorscale: scheme.name(),
        zmin: 0,
        zmax: 1,
        colorbar: ColorBar {
            title: Title::plain("Voxel Density"),
        },
    };

    let mut yaxis = axis(&format!("{} Coordinate", row_axis));
    yaxis.scaleanchor = Some("x");

    Figure {
        data: vec![Trace::Heatmap(trace)],
        layout: Layout {
            title: Title {
                text: slice.title(),
                x: Some(0.5),
                font: Some(Font { size: 16 }),
            },
            scene: None,
            xaxis: Some(axis(&format!("{} Coordinate", col_axis))),
            yaxis: Some(yaxis),
            width: 600,
            height: 500,
            paper_bgcolor: "white",
            plot_bgcolor: "white",
        },
    }
}

/// Format a count with comma thousands separators
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::ColorMode;
    use crate::slice::{extract, Axis as SliceAxis};
    use serde_json::Value;

    fn grid() -> OccupancyGrid {
        OccupancyGrid::from_occupied([3, 3, 3], 0.5, &[[0, 0, 0], [1, 1, 1], [2, 1, 0]]).unwrap()
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1234), "1,234");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_scatter_json_shape() {
        let params = ViewParams {
            color_mode: ColorMode::XCoordinate,
            ..ViewParams::default()
        };
        let json: Value = serde_json::from_str(&scatter3d(&grid(), &params).unwrap().to_json().unwrap()).unwrap();
        let trace = &json["data"][0];
        assert_eq!(trace["type"], "scatter3d");
        assert_eq!(trace["x"].as_array().unwrap().len(), 3);
        assert_eq!(trace["marker"]["colorscale"], "Viridis");
        assert_eq!(trace["marker"]["color"][2], 2.0);
        assert_eq!(trace["marker"]["colorbar"]["title"]["text"], "X");
        assert_eq!(trace["text"][1], "Voxel (1,1,1)");
        assert_eq!(json["layout"]["title"]["text"], "Voxelized STL Model (3 voxels)");
        assert_eq!(json["layout"]["scene"]["aspectmode"], "cube");
    }

    #[test]
    fn test_scatter_empty_grid() {
        let empty = OccupancyGrid::from_occupied([2, 2, 2], 1.0, &[]).unwrap();
        let result = scatter3d(&empty, &ViewParams::default());
        assert!(matches!(result, Err(VoxelizeError::EmptyGrid)));
    }

    #[test]
    fn test_heatmap_labels() {
        let slice = extract(&grid(), SliceAxis::Y, Some(1)).unwrap();
        let json: Value = serde_json::from_str(&heatmap(&slice, ColorScheme::Ice).to_json().unwrap()).unwrap();
        assert_eq!(json["data"][0]["type"], "heatmap");
        assert_eq!(json["data"][0]["z"], serde_json::json!([[0, 0, 0], [0, 1, 0], [1, 0, 0]]));
        assert_eq!(json["layout"]["title"]["text"], "Y-slice at index 1");
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], "Z Coordinate");
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "X Coordinate");
        assert_eq!(json["data"][0]["colorbar"]["title"]["text"], "Voxel Density");
    }
}
