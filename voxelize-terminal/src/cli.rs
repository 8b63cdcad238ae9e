//! `voxelize` command line.
//!
//! Values come from built-in defaults, then an optional `--config` JSON
//! file, then command-line flags, each overriding the previous layer.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use voxelize_core::{
    render, Axis, ColorMode, ColorScheme, FillMode, MarkerSize, Mesh, Opacity, Resolution,
    RotationState, Session, Settings, Upload,
};

use crate::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "voxelize")]
#[command(about = "Convert STL meshes into voxel grids, preview and export them", long_about = None)]
pub struct Cli {
    /// JSON settings file; command-line flags take precedence
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print mesh and voxel information
    Info(GridArgs),
    /// Write the voxel array (.npy) and/or the occupied coordinates (.csv)
    Export(ExportArgs),
    /// Render the occupied voxels as a 3D scatter image (PNG)
    Render(RenderArgs),
    /// Render one cross-section as a heatmap image (PNG)
    Slice(SliceArgs),
    /// Print the plotly figure JSON of the 3D scatter or a slice
    Figure(FigureArgs),
    /// Explore the voxels interactively in the terminal
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Input STL file
    pub input: PathBuf,

    /// Cells along the longest side of the bounding box (10-200)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(10..=200))]
    pub resolution: Option<u32>,

    /// Which cells are occupied: surface or solid
    #[arg(long)]
    pub fill: Option<FillMode>,
}

#[derive(Args, Debug)]
pub struct StyleArgs {
    /// Color scheme, e.g. Viridis, Plasma, RdBu
    #[arg(long)]
    pub scheme: Option<ColorScheme>,

    /// Color mapping: z, y, x, distance, radial or random
    #[arg(long)]
    pub color_by: Option<ColorMode>,

    /// Marker opacity (0.1-1.0)
    #[arg(long)]
    pub opacity: Option<f64>,

    /// Marker size (1-10)
    #[arg(long)]
    pub marker_size: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SliceSelectArgs {
    /// Slice axis: x, y or z
    #[arg(long)]
    pub axis: Option<Axis>,

    /// Slice index along the axis (middle slice by default)
    #[arg(long)]
    pub index: Option<usize>,

    /// Color scheme of the slice
    #[arg(long)]
    pub slice_scheme: Option<ColorScheme>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Write the voxel array
    #[arg(long)]
    pub npy: bool,

    /// Write the occupied coordinates
    #[arg(long)]
    pub csv: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, default_value = "900")]
    pub width: u32,

    #[arg(long, default_value = "700")]
    pub height: u32,
}

#[derive(Args, Debug)]
pub struct SliceArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    #[command(flatten)]
    pub select: SliceSelectArgs,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Pixels per voxel
    #[arg(long, default_value = "8")]
    pub cell_px: u32,
}

#[derive(Args, Debug)]
pub struct FigureArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    #[command(flatten)]
    pub style: StyleArgs,

    #[command(flatten)]
    pub select: SliceSelectArgs,

    /// Print the slice heatmap instead of the 3D scatter
    #[arg(long)]
    pub slice: bool,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Input STL file; a demo cube when omitted
    pub input: Option<PathBuf>,

    #[arg(short, long, value_parser = clap::value_parser!(u32).range(10..=200))]
    pub resolution: Option<u32>,

    #[arg(long)]
    pub fill: Option<FillMode>,

    #[command(flatten)]
    pub style: StyleArgs,
}

impl GridArgs {
    fn apply(&self, settings: &mut Settings) -> Result<()> {
        apply_grid(settings, self.resolution, self.fill)
    }

    fn open(&self, settings: &Settings) -> Result<Session> {
        open_session(&self.input, settings)
    }
}

impl StyleArgs {
    fn apply(&self, settings: &mut Settings) -> Result<()> {
        let view = &mut settings.view;
        if let Some(scheme) = self.scheme {
            view.color_scheme = scheme;
        }
        if let Some(mode) = self.color_by {
            view.color_mode = mode;
        }
        if let Some(opacity) = self.opacity {
            view.opacity = Opacity::new(opacity)?;
        }
        if let Some(size) = self.marker_size {
            view.marker_size = MarkerSize::new(size)?;
        }
        Ok(())
    }
}

impl SliceSelectArgs {
    fn apply(&self, settings: &mut Settings) {
        let slice = &mut settings.slice;
        if let Some(axis) = self.axis {
            slice.axis = axis;
        }
        if self.index.is_some() {
            slice.index = self.index;
        }
        if let Some(scheme) = self.slice_scheme {
            slice.color_scheme = scheme;
        }
    }
}

fn apply_grid(settings: &mut Settings, resolution: Option<u32>, fill: Option<FillMode>) -> Result<()> {
    if let Some(resolution) = resolution {
        settings.resolution = Resolution::new(resolution)?;
    }
    if let Some(fill) = fill {
        settings.fill = fill;
    }
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn open_session(input: &Path, settings: &Settings) -> Result<Session> {
    let upload = Upload::from_path(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let session = Session::open(&upload, settings.resolution, settings.fill)?;
    Ok(session)
}

pub fn run(cli: Cli) -> Result<()> {
    let mut settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Info(args) => {
            args.apply(&mut settings)?;
            let session = args.open(&settings)?;
            println!("{}", session.report());
        }
        Commands::Export(args) => {
            args.grid.apply(&mut settings)?;
            let session = args.grid.open(&settings)?;
            export(&session, &args)?;
        }
        Commands::Render(args) => {
            args.grid.apply(&mut settings)?;
            args.style.apply(&mut settings)?;
            let session = args.grid.open(&settings)?;
            let img = render::render_scatter(
                session.grid(),
                &settings.view,
                &RotationState::default(),
                args.width,
                args.height,
            )?;
            img.save(&args.output)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
            info!("wrote {}", args.output.display());
        }
        Commands::Slice(args) => {
            args.grid.apply(&mut settings)?;
            args.select.apply(&mut settings);
            let session = args.grid.open(&settings)?;
            let slice = session.slice(&settings.slice)?;
            let img = render::render_slice(&slice, settings.slice.color_scheme, args.cell_px)?;
            img.save(&args.output)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
            println!("{} ({} x {})", slice.title(), slice.rows, slice.cols);
        }
        Commands::Figure(args) => {
            args.grid.apply(&mut settings)?;
            args.style.apply(&mut settings)?;
            args.select.apply(&mut settings);
            let session = args.grid.open(&settings)?;
            let figure = if args.slice {
                session.heatmap(&settings.slice)?
            } else {
                session.scatter(&settings.view)?
            };
            println!("{}", figure.to_json()?);
        }
        Commands::View(args) => {
            apply_grid(&mut settings, args.resolution, args.fill)?;
            args.style.apply(&mut settings)?;
            let session = match &args.input {
                Some(path) => open_session(path, &settings)?,
                None => Session::from_mesh("cube", Mesh::cube(2.0), settings.resolution, settings.fill)?,
            };
            let mut app = TerminalApp::new(session, settings.view, settings.slice)?;
            app.run()?;
        }
    }

    Ok(())
}

fn export(session: &Session, args: &ExportArgs) -> Result<()> {
    // Both formats unless one was asked for
    let (npy, csv) = match (args.npy, args.csv) {
        (false, false) => (true, true),
        other => other,
    };
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    if npy {
        let path = args.output_dir.join(session.voxels_file_name());
        fs::write(&path, session.export_npy()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    if csv {
        let path = args.output_dir.join(session.coordinates_file_name());
        fs::write(&path, session.export_csv()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
