/// ASCII rasterizer for voxel point clouds and slices
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use voxelize_core::{render::project_cells, ColorScheme, OccupancyGrid, RotationState, Slice, ViewParams};

/// Character luminosity ramp for depth (farthest to nearest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: usize = 2;

/// ASCII renderer that converts occupancy grids to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    fn put(&mut self, x: usize, y: usize, c: char, color: Color) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.char_buffer[idx] = c;
            self.color_buffer[idx] = color;
        }
    }

    /// Draw the occupied cells, nearer cells drawn over farther ones
    pub fn render_points(&mut self, grid: &OccupancyGrid, params: &ViewParams, rotation: &RotationState) {
        let virtual_height = self.height * CELL_ASPECT;
        let splats = project_cells(
            grid,
            params,
            rotation,
            self.width as u32,
            virtual_height as u32,
        );
        let (near, far) = splats.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.screen.depth), hi.max(s.screen.depth))
        });
        let span = (far - near).max(f32::EPSILON);

        for splat in &splats {
            let closeness = 1.0 - (splat.screen.depth - near) / span;
            let char_index = (closeness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
            let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];
            let [r, g, b] = params.color_scheme.sample(splat.t);

            self.put(
                splat.screen.x as usize,
                splat.screen.y as usize / CELL_ASPECT,
                character,
                Color::Rgb { r, g, b },
            );
        }
    }

    /// Draw a slice centred in the viewport, one character per cell, first row at the bottom
    pub fn render_slice(&mut self, slice: &Slice, scheme: ColorScheme) {
        let [er, eg, eb] = scheme.sample(0.0);
        let [fr, fg, fb] = scheme.sample(1.0);
        let left = self.width.saturating_sub(slice.cols) / 2;
        let top = self.height.saturating_sub(slice.rows) / 2;

        for row in 0..slice.rows {
            let y = top + slice.rows - 1 - row;
            for col in 0..slice.cols {
                let (c, color) = if slice.get(row, col) > 0 {
                    ('█', Color::Rgb { r: fr, g: fg, b: fb })
                } else {
                    ('·', Color::Rgb { r: er, g: eg, b: eb })
                };
                self.put(left + col, y, c, color);
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn filled(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelize_core::slice::{extract, Axis};

    fn grid() -> OccupancyGrid {
        OccupancyGrid::from_occupied([3, 3, 3], 1.0, &[[0, 0, 0], [1, 1, 1], [2, 2, 2]]).unwrap()
    }

    #[test]
    fn test_render_points_marks_cells() {
        let mut renderer = AsciiRenderer::new(60, 30);
        renderer.render_points(&grid(), &ViewParams::default(), &RotationState::default());
        assert!(renderer.filled() > 0);
        renderer.clear();
        assert_eq!(renderer.filled(), 0);
    }

    #[test]
    fn test_render_slice_draws_every_cell() {
        let mut renderer = AsciiRenderer::new(10, 10);
        let slice = extract(&grid(), Axis::Z, Some(1)).unwrap();
        renderer.render_slice(&slice, ColorScheme::Viridis);
        assert_eq!(renderer.filled(), 9);
        assert_eq!(renderer.char_buffer.iter().filter(|&&c| c == '█').count(), 1);
    }

    #[test]
    fn test_draw_writes_all_cells() {
        let mut renderer = AsciiRenderer::new(4, 2);
        renderer.put(1, 1, '#', Color::White);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('#'));
    }
}
