/// Axis-aligned cross-sections of an occupancy grid
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxelizeError};
use crate::voxel::OccupancyGrid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes left in a slice, as (rows, columns)
    pub fn remaining(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Axis {
    type Err = VoxelizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(VoxelizeError::InvalidParameter {
                name: "slice axis",
                reason: format!("expected x, y or z, got '{}'", other),
            }),
        }
    }
}

/// One 2D cross-section, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub axis: Axis,
    pub index: usize,
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<u8>,
}

impl Slice {
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.values[row * self.cols + col]
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Values as nested rows, the layout heatmaps expect
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.values.chunks(self.cols).map(<[u8]>::to_vec).collect()
    }

    pub fn title(&self) -> String {
        format!("{}-slice at index {}", self.axis, self.index)
    }
}

/// Number of slices available along `axis`
pub fn slice_count(grid: &OccupancyGrid, axis: Axis) -> usize {
    grid.shape()[axis.index()]
}

/// The middle slice along `axis`
pub fn default_index(grid: &OccupancyGrid, axis: Axis) -> usize {
    slice_count(grid, axis) / 2
}

/// Cut the grid at `index` along `axis` (the middle slice when `None`)
pub fn extract(grid: &OccupancyGrid, axis: Axis, index: Option<usize>) -> Result<Slice> {
    let len = slice_count(grid, axis);
    let index = index.unwrap_or_else(|| default_index(grid, axis));
    if index >= len {
        return Err(VoxelizeError::SliceOutOfRange { axis, index, len });
    }

    let shape = grid.shape();
    let (row_axis, col_axis) = axis.remaining();
    let (rows, cols) = (shape[row_axis.index()], shape[col_axis.index()]);

    let mut values = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let mut ijk = [0usize; 3];
            ijk[axis.index()] = index;
            ijk[row_axis.index()] = r;
            ijk[col_axis.index()] = c;
            values.push(grid.get(ijk[0], ijk[1], ijk[2]) as u8);
        }
    }

    Ok(Slice {
        axis,
        index,
        rows,
        cols,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> OccupancyGrid {
        OccupancyGrid::from_occupied([2, 3, 4], 1.0, &[[0, 1, 2], [1, 2, 3], [1, 0, 0]]).unwrap()
    }

    #[test]
    fn test_slice_shapes_drop_axis() {
        let grid = sample_grid();
        assert_eq!(extract(&grid, Axis::X, Some(0)).unwrap().shape(), [3, 4]);
        assert_eq!(extract(&grid, Axis::Y, Some(0)).unwrap().shape(), [2, 4]);
        assert_eq!(extract(&grid, Axis::Z, Some(0)).unwrap().shape(), [2, 3]);
    }

    #[test]
    fn test_slice_values() {
        let grid = sample_grid();
        let x0 = extract(&grid, Axis::X, Some(0)).unwrap();
        assert_eq!(x0.get(1, 2), 1);
        assert_eq!(x0.values.iter().filter(|&&v| v == 1).count(), 1);

        let z3 = extract(&grid, Axis::Z, Some(3)).unwrap();
        assert_eq!(z3.to_rows(), vec![vec![0, 0, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_default_is_middle() {
        let grid = sample_grid();
        let slice = extract(&grid, Axis::Z, None).unwrap();
        assert_eq!(slice.index, 2);
        assert_eq!(slice.title(), "Z-slice at index 2");
        assert_eq!(default_index(&grid, Axis::Y), 1);
    }

    #[test]
    fn test_out_of_range() {
        let grid = sample_grid();
        let err = extract(&grid, Axis::X, Some(2)).unwrap_err();
        assert!(matches!(
            err,
            VoxelizeError::SliceOutOfRange { axis: Axis::X, index: 2, len: 2 }
        ));
    }

    #[test]
    fn test_parse_axis() {
        assert_eq!("y".parse::<Axis>().unwrap(), Axis::Y);
        assert!("w".parse::<Axis>().is_err());
    }
}
