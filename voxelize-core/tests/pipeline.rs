use approx::assert_relative_eq;
use voxelize_core::{
    coloring::color_values, export, slice, Axis, ColorMode, FillMode, Mesh, Resolution, Session,
    SliceParams, Upload, ViewParams, VoxelizeError,
};

/// Binary STL bytes for a mesh
fn to_binary_stl(mesh: &Mesh) -> Vec<u8> {
    let mut data = vec![0u8; 80];
    data.extend_from_slice(&(mesh.faces.len() as u32).to_le_bytes());
    for face in &mesh.faces {
        data.extend_from_slice(&[0u8; 12]);
        for p in mesh.triangle(face) {
            for c in [p.x, p.y, p.z] {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        data.extend_from_slice(&[0u8; 2]);
    }
    data
}

fn cube_session(size: f32, resolution: u32, fill: FillMode) -> Session {
    let upload = Upload::new("cube.stl", to_binary_stl(&Mesh::cube(size)));
    Session::open(&upload, Resolution::new(resolution).unwrap(), fill).unwrap()
}

#[test]
fn pitch_and_shape_follow_resolution() {
    let session = cube_session(10.0, 50, FillMode::Surface);
    let grid = session.grid();

    assert_relative_eq!(grid.pitch(), 0.2, epsilon = 1e-6);
    assert_relative_eq!(10.0 / grid.pitch(), 50.0, epsilon = 1e-3);
    for n in grid.shape() {
        assert!((48..=53).contains(&n), "unexpected grid shape {:?}", grid.shape());
    }
}

#[test]
fn counts_and_fill_ratio_are_consistent() {
    let session = cube_session(4.0, 20, FillMode::Surface);
    let grid = session.grid();
    let [nx, ny, nz] = grid.shape();

    assert_eq!(grid.total_count(), nx * ny * nz);
    assert!(grid.filled_count() > 0);
    let ratio = grid.fill_ratio();
    assert!((0.0..=1.0).contains(&ratio));
    assert_relative_eq!(ratio, grid.filled_count() as f64 / grid.total_count() as f64);

    let report = session.report();
    assert_eq!(report.mesh.vertices, 8);
    assert_eq!(report.mesh.faces, 12);
    assert_eq!(report.grid.filled, grid.filled_count());
}

#[test]
fn solid_fill_adds_interior_cells() {
    let surface = cube_session(4.0, 20, FillMode::Surface);
    let solid = cube_session(4.0, 20, FillMode::Solid);
    assert!(solid.grid().filled_count() > surface.grid().filled_count());

    let [nx, ny, nz] = solid.grid().shape();
    assert!(solid.grid().get(nx / 2, ny / 2, nz / 2));
    assert!(!surface.grid().get(nx / 2, ny / 2, nz / 2));
}

#[test]
fn random_coloring_repeats_across_redraws() {
    let session = cube_session(4.0, 12, FillMode::Surface);
    let points = session.grid().occupied();
    let first = color_values(&points, ColorMode::Random);
    let second = color_values(&points, ColorMode::Random);
    assert_eq!(first, second);

    let params = ViewParams {
        color_mode: ColorMode::Random,
        ..ViewParams::default()
    };
    let a = session.scatter(&params).unwrap().to_json().unwrap();
    let b = session.scatter(&params).unwrap().to_json().unwrap();
    assert_eq!(a, b);
}

#[test]
fn slices_drop_their_axis() {
    let session = cube_session(4.0, 16, FillMode::Surface);
    let [nx, ny, nz] = session.grid().shape();

    for (axis, expected) in [(Axis::X, [ny, nz]), (Axis::Y, [nx, nz]), (Axis::Z, [nx, ny])] {
        let params = SliceParams {
            axis,
            ..SliceParams::default()
        };
        let slice = session.slice(&params).unwrap();
        assert_eq!(slice.shape(), expected);
        assert_eq!(slice.index, slice::default_index(session.grid(), axis));
    }

    let too_far = SliceParams {
        axis: Axis::Z,
        index: Some(nz),
        ..SliceParams::default()
    };
    assert!(matches!(
        session.slice(&too_far),
        Err(VoxelizeError::SliceOutOfRange { .. })
    ));
}

#[test]
fn csv_has_one_row_per_filled_cell() {
    let session = cube_session(4.0, 16, FillMode::Surface);
    let csv = session.export_csv().unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("X,Y,Z"));
    assert_eq!(lines.count(), session.grid().filled_count());

    let npy = session.export_npy().unwrap();
    let header_len = u16::from_le_bytes([npy[8], npy[9]]) as usize;
    assert_eq!(npy.len() - 10 - header_len, session.grid().total_count());
    assert_eq!(export::voxels_file_name(session.stem()), "cube_voxels.npy");
}

#[test]
fn unparsable_upload_yields_one_error() {
    let upload = Upload::new("broken.stl", vec![0xde, 0xad, 0xbe, 0xef]);
    match Session::open(&upload, Resolution::default(), FillMode::Surface) {
        Err(VoxelizeError::Load(message)) => assert!(!message.is_empty()),
        Err(other) => panic!("expected a load error, got {other}"),
        Ok(_) => panic!("garbage should not load"),
    }
}

#[test]
fn nan_vertex_is_rejected_before_voxelizing() {
    let mut mesh = Mesh::cube(2.0);
    mesh.vertices[6].x = f32::NAN;
    // The remaining vertices still span a finite box
    assert_eq!(mesh.bounds().max_extent(), 2.0);

    let upload = Upload::new("nan.stl", to_binary_stl(&mesh));
    match Session::open(&upload, Resolution::default(), FillMode::Surface) {
        Err(VoxelizeError::Load(message)) => assert!(message.contains("non-finite")),
        Err(other) => panic!("expected a load error, got {other}"),
        Ok(_) => panic!("a NaN vertex should not load"),
    }
}

#[test]
fn revoxelize_recomputes_grid() {
    let mut session = cube_session(4.0, 10, FillMode::Surface);
    let coarse = session.grid().shape();
    session
        .revoxelize(Resolution::new(40).unwrap(), FillMode::Surface)
        .unwrap();
    let fine = session.grid().shape();
    assert!(fine[0] > coarse[0]);
    assert_relative_eq!(session.grid().pitch(), 0.1, epsilon = 1e-6);
}
