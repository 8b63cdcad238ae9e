//! Raster images of a grid for use outside the browser.

use image::{Rgb, RgbImage};
use log::debug;
use nalgebra::Point3;

use crate::coloring::color_values;
use crate::colormap::{normalize, ColorScheme};
use crate::error::{Result, VoxelizeError};
use crate::params::ViewParams;
use crate::projection::{Camera, ScreenPoint};
use crate::slice::Slice;
use crate::transform::{RotationState, Transform};
use crate::voxel::OccupancyGrid;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// A projected, colored occupied cell
#[derive(Debug, Clone, Copy)]
pub struct Splat {
    pub screen: ScreenPoint,
    /// Position on the color scale, in [0, 1]
    pub t: f64,
}

/// Project every occupied cell into a `width` x `height` viewport, farthest first
pub fn project_cells(
    grid: &OccupancyGrid,
    params: &ViewParams,
    rotation: &RotationState,
    width: u32,
    height: u32,
) -> Vec<Splat> {
    let points = grid.occupied();
    let scalars = normalize(&color_values(&points, params.color_mode));

    let model = Transform::model_matrix(grid.shape(), rotation);
    let mut camera = Camera::new(width, height);
    camera.fit_radius(3f32.sqrt());

    let mut splats: Vec<Splat> = points
        .iter()
        .zip(scalars)
        .filter_map(|(p, t)| {
            let cell = Point3::new(p[0] as f32, p[1] as f32, p[2] as f32);
            camera
                .project_to_screen(&cell, &model, width, height)
                .map(|screen| Splat { screen, t })
        })
        .collect();

    splats.sort_by(|a, b| b.screen.depth.total_cmp(&a.screen.depth));
    splats
}

/// Draw the occupied cells as square markers, the native counterpart of the 3D scatter
pub fn render_scatter(
    grid: &OccupancyGrid,
    params: &ViewParams,
    rotation: &RotationState,
    width: u32,
    height: u32,
) -> Result<RgbImage> {
    if grid.is_empty() {
        return Err(VoxelizeError::EmptyGrid);
    }

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let splats = project_cells(grid, params, rotation, width, height);
    let size = params.marker_size.get() as i64;
    let alpha = params.opacity.get();

    for splat in &splats {
        let color = params.color_scheme.sample(splat.t);
        let x0 = splat.screen.x as i64 - size / 2;
        let y0 = splat.screen.y as i64 - size / 2;
        for y in y0..y0 + size.max(1) {
            for x in x0..x0 + size.max(1) {
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    continue;
                }
                let px = img.get_pixel_mut(x as u32, y as u32);
                *px = blend(*px, color, alpha);
            }
        }
    }

    debug!("rendered {} markers into {}x{} image", splats.len(), width, height);
    Ok(img)
}

/// Draw a slice as a heatmap, `cell_px` pixels per cell, first row at the bottom
pub fn render_slice(slice: &Slice, scheme: ColorScheme, cell_px: u32) -> Result<RgbImage> {
    let cell_px = cell_px.max(1);
    let (empty, filled) = (scheme.sample(0.0), scheme.sample(1.0));
    let side = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|n| n.checked_mul(cell_px))
            .ok_or_else(|| VoxelizeError::InvalidParameter {
                name: "cell size",
                reason: format!("{} cells of {} px do not fit in an image", cells, cell_px),
            })
    };
    let (width, height) = (side(slice.cols)?, side(slice.rows)?);

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let col = (x / cell_px) as usize;
        let row = slice.rows - 1 - (y / cell_px) as usize;
        if slice.get(row, col) > 0 {
            Rgb(filled)
        } else {
            Rgb(empty)
        }
    }))
}

fn blend(under: Rgb<u8>, over: [u8; 3], alpha: f64) -> Rgb<u8> {
    let mix = |a: u8, b: u8| (a as f64 * (1.0 - alpha) + b as f64 * alpha).round() as u8;
    Rgb([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
    ])
}
