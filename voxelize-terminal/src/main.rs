/// Voxelize - STL voxelization from the terminal
///
/// Run `voxelize --help` for the subcommands. `voxelize view [file.stl]`
/// opens the interactive viewer:
///   - WASD / Arrow Keys: Rotate
///   - Space: Toggle auto-rotation
///   - C / N: Cycle color mapping / color scheme
///   - [ / ]: Lower / raise the resolution
///   - V: Toggle between 3D points and slices (X/Y/Z axis, , and . to step)
///   - Q/ESC: Quit

use clap::Parser;
use std::process::ExitCode;
use voxelize_terminal::cli::{self, Cli};

fn main() -> ExitCode {
    env_logger::init();

    match cli::run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
