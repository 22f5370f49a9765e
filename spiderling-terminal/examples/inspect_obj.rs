//! Example: Load an OBJ file and report what was assembled, without opening the viewer
//!
//! Usage: cargo run --example inspect_obj -- path/to/model.obj

use std::env;
use std::path::Path;
use std::process::ExitCode;

use spiderling_core::{load_model, DisplayMode, LoadOptions};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        let program = args.first().map(String::as_str).unwrap_or("inspect_obj");
        eprintln!("Usage: {} <obj-file>", program);
        return ExitCode::FAILURE;
    };

    let model = match load_model(Path::new(path), &LoadOptions::default()) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Loaded {} triangles", model.mesh.len());
    for mode in [DisplayMode::Solid, DisplayMode::Wireframe, DisplayMode::Points] {
        println!("  {:>9}: {} primitives", mode.label(), model.mesh.primitives(mode).count());
    }
    if let Some(bounds) = model.mesh.bounds() {
        println!("  bounds: {:?} .. {:?}", bounds.min.coords.as_slice(), bounds.max.coords.as_slice());
    }

    for warning in &model.warnings {
        println!("  skipped: {}", warning);
    }

    ExitCode::SUCCESS
}
