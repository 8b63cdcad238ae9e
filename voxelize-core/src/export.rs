/// Download formats for a computed grid: a NumPy array and a coordinate table
use std::io::Write;

use log::debug;

use crate::error::Result;
use crate::voxel::OccupancyGrid;

const NPY_MAGIC: &[u8] = b"\x93NUMPY";
const NPY_ALIGN: usize = 64;

/// `<stem>_voxels.npy`
pub fn voxels_file_name(stem: &str) -> String {
    format!("{}_voxels.npy", stem)
}

/// `<stem>_coordinates.csv`
pub fn coordinates_file_name(stem: &str) -> String {
    format!("{}_coordinates.csv", stem)
}

/// Write the grid as an NPY v1.0 array of `uint8` in C order
pub fn write_npy<W: Write>(grid: &OccupancyGrid, writer: &mut W) -> Result<()> {
    let [nx, ny, nz] = grid.shape();
    let mut header = format!(
        "{{'descr': '|u1', 'fortran_order': False, 'shape': ({}, {}, {}), }}",
        nx, ny, nz
    );
    // magic + version + u16 length, then the header padded with spaces and ended by '\n'
    let preamble = NPY_MAGIC.len() + 2 + 2;
    let unpadded = preamble + header.len() + 1;
    let padding = (NPY_ALIGN - unpadded % NPY_ALIGN) % NPY_ALIGN;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    writer.write_all(NPY_MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_all(&(header.len() as u16).to_le_bytes())?;
    writer.write_all(header.as_bytes())?;

    let data: Vec<u8> = grid.cells().iter().map(|&c| c as u8).collect();
    writer.write_all(&data)?;
    debug!("wrote npy array of shape {:?}", grid.shape());
    Ok(())
}

/// Write one `X,Y,Z` row per occupied cell, with a header row
pub fn write_csv<W: Write>(grid: &OccupancyGrid, writer: &mut W) -> Result<()> {
    writeln!(writer, "X,Y,Z")?;
    let occupied = grid.occupied();
    for [x, y, z] in &occupied {
        writeln!(writer, "{},{},{}", x, y, z)?;
    }
    debug!("wrote {} coordinate rows", occupied.len());
    Ok(())
}

pub fn npy_bytes(grid: &OccupancyGrid) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(NPY_ALIGN * 2 + grid.total_count());
    write_npy(grid, &mut buf)?;
    Ok(buf)
}

pub fn csv_string(grid: &OccupancyGrid) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(grid, &mut buf)?;
    // Only ASCII digits, commas and newlines are written
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> OccupancyGrid {
        OccupancyGrid::from_occupied([2, 3, 4], 0.25, &[[0, 0, 1], [1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(voxels_file_name("bunny"), "bunny_voxels.npy");
        assert_eq!(coordinates_file_name("bunny"), "bunny_coordinates.csv");
    }

    #[test]
    fn test_npy_layout() {
        let bytes = npy_bytes(&grid()).unwrap();
        assert_eq!(&bytes[..6], NPY_MAGIC);
        assert_eq!(&bytes[6..8], &[1, 0]);

        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        assert_eq!((10 + header_len) % NPY_ALIGN, 0);

        let header = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();
        assert!(header.starts_with("{'descr': '|u1', 'fortran_order': False, 'shape': (2, 3, 4), }"));
        assert!(header.ends_with('\n'));

        let data = &bytes[10 + header_len..];
        assert_eq!(data.len(), 24);
        assert_eq!(data.iter().filter(|&&b| b == 1).count(), 2);
        assert_eq!(data[1], 1);
        assert_eq!(data[23], 1);
    }

    #[test]
    fn test_csv_rows() {
        let csv = csv_string(&grid()).unwrap();
        assert_eq!(csv, "X,Y,Z\n0,0,1\n1,2,3\n");
    }

    #[test]
    fn test_csv_empty_grid_has_header_only() {
        let empty = OccupancyGrid::from_occupied([1, 1, 1], 1.0, &[]).unwrap();
        assert_eq!(csv_string(&empty).unwrap(), "X,Y,Z\n");
    }
}
