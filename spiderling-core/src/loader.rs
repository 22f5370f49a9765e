//! Model file loading: format check, file access, parse and assembly
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::assembler::{LoadedModel, MeshLoader};
use crate::error::{LoadError, ParseError};
use crate::obj::{CornerFormat, RecordParser};

/// Substring a model file name must contain to be accepted
const FORMAT_MARKER: &str = "obj";

/// Options controlling how permissive parsing is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub corner_format: CornerFormat,
}

/// Reject file names that do not look like OBJ models, without touching the file
pub fn check_format(path: &Path) -> Result<(), LoadError> {
    let supported = path
        .file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_ascii_lowercase()
                .contains(FORMAT_MARKER)
        })
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

/// Load and assemble a model file
pub fn load_model(path: &Path, options: &LoadOptions) -> Result<LoadedModel, LoadError> {
    check_format(path)?;

    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    info!("Loading model: {}", path.display());

    let model = load_from_reader(BufReader::new(file), options).map_err(io_error)?;
    info!(
        "Loaded {} triangles from {} ({} lines skipped)",
        model.mesh.len(),
        path.display(),
        model.warnings.len()
    );
    Ok(model)
}

/// Parse and assemble from any buffered text source
pub fn load_from_reader<R: BufRead>(
    reader: R,
    options: &LoadOptions,
) -> Result<LoadedModel, std::io::Error> {
    let records = RecordParser::new(reader).with_corner_format(options.corner_format);

    let mut loader = MeshLoader::new();
    match loader.consume(records) {
        Ok(()) => Ok(loader.finish()),
        Err(ParseError::Io(source)) => Err(source),
        // consume only hands back read failures
        Err(other) => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            other.to_string(),
        )),
    }
}
