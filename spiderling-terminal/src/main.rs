//! Spiderling - terminal viewer for Wavefront OBJ models
//!
//! Controls:
//!   - Left/Right: Orbit the camera
//!   - Up/Down: Zoom
//!   - M/Tab, 1/2/3: Solid, wireframe or point display
//!   - Space: Toggle automatic spin
//!   - Q/ESC: Quit

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info, warn};
use spiderling_core::{load_model, CornerFormat, DisplayMode, Mesh};
use spiderling_terminal::{Viewer, ViewerConfig};
use std::fs::File;
use std::path::PathBuf;
use structopt::StructOpt;

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "spiderling", about = "Rotating terminal viewer for .obj models")]
struct CliArgs {
    /// Model to display; a cube is shown when omitted
    #[structopt(parse(from_os_str))]
    model: Option<PathBuf>,
    /// TOML file with viewer settings
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Initial display mode: solid, wireframe or points
    #[structopt(short = "m", long = "mode")]
    mode: Option<DisplayMode>,
    /// Target frames per second
    #[structopt(long = "fps")]
    fps: Option<u32>,
    /// Accept face corners without texture or normal indices
    #[structopt(long = "partial-corners")]
    partial_corners: bool,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
    /// Write log output to this file instead of stderr
    #[structopt(long = "log-file", parse(from_os_str))]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();
    init_logging(&args)?;

    let config = build_config(&args)?;

    let (mesh, title, status) = match &args.model {
        None => (Mesh::cube(2.0), "cube".to_string(), None),
        Some(path) => {
            let title = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            // A failed load still opens the viewer, with nothing to show
            match load_model(path, &config.load) {
                Ok(model) => {
                    let status = if model.warnings.is_empty() {
                        None
                    } else {
                        warn!("{} lines of {} were skipped", model.warnings.len(), title);
                        Some(format!(
                            "{} lines skipped, first: {}",
                            model.warnings.len(),
                            model.warnings[0]
                        ))
                    };
                    (model.mesh, title, status)
                }
                Err(e) => {
                    error!("{}", e);
                    (Mesh::default(), title, Some(e.to_string()))
                }
            }
        }
    };

    info!("Starting viewer with {} triangles", mesh.len());
    let mut viewer = Viewer::new(mesh, title, &config)
        .context("Could not query terminal size")?
        .with_status(status);
    viewer.run().context("Terminal error")?;

    Ok(())
}

fn init_logging(args: &CliArgs) -> Result<()> {
    let level = if args.verbose { "debug" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(level));

    // The viewer owns the terminal, so logs are best sent elsewhere while it runs
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Could not create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Config file values, overridden by command line flags
fn build_config(args: &CliArgs) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };

    if let Some(mode) = args.mode {
        config.display_mode = mode;
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if args.partial_corners {
        config.load.corner_format = CornerFormat::Partial;
    }

    Ok(config)
}
