/// Example: Voxelize an STL file and explore it in the terminal
///
/// Usage: cargo run --example load_stl -- path/to/file.stl [resolution]

use std::env;
use std::io;
use std::path::Path;
use voxelize_core::{FillMode, Mesh, Resolution, Session, SliceParams, Upload, ViewParams};
use voxelize_terminal::TerminalApp;

fn to_io(e: voxelize_core::VoxelizeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let resolution = args
        .get(2)
        .and_then(|r| r.parse().ok())
        .map(Resolution::new)
        .transpose()
        .map_err(to_io)?
        .unwrap_or_default();

    let session = match args.get(1) {
        Some(stl_path) => {
            println!("Loading STL file: {}", stl_path);
            let upload = Upload::from_path(Path::new(stl_path)).map_err(to_io)?;
            Session::open(&upload, resolution, FillMode::Surface).map_err(to_io)?
        }
        None => {
            eprintln!("Usage: {} <stl-file> [resolution]", args[0]);
            eprintln!("\nNo STL file provided, using default cube...");
            Session::from_mesh("cube", Mesh::cube(2.0), resolution, FillMode::Surface)
                .map_err(to_io)?
        }
    };

    println!("{}", session.report());
    println!("Starting terminal viewer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(session, ViewParams::default(), SliceParams::default())?;
    app.run()?;

    Ok(())
}
