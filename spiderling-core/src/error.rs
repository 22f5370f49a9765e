//! Errors and warnings produced while loading a model.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Returned by the record parser for a single line
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line names a known record type but its fields do not decode
    #[error("line {line}: malformed '{keyword}' record: {reason}")]
    Malformed {
        line: usize,
        keyword: &'static str,
        reason: String,
    },
    /// The leading token is not a recognized record type
    #[error("line {line}: unknown line type '{token}'")]
    UnknownLineType { line: usize, token: String },
    /// Reading from the source failed
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

/// Fatal to the load of one file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file '{}' is not supported, please provide an .obj file", .path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Pool a face corner refers into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Position => "vertex",
            Attribute::TexCoord => "texcoord",
            Attribute::Normal => "normal",
        })
    }
}

/// A recoverable problem; the offending line or face was skipped
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadWarning {
    #[error("line {line}: malformed '{keyword}' record: {reason}")]
    MalformedRecord {
        line: usize,
        keyword: &'static str,
        reason: String,
    },
    #[error("line {line}: unknown line type '{token}'")]
    UnknownLineType { line: usize, token: String },
    #[error("line {line}: face references {attribute} {index} but only {available} defined")]
    DanglingIndex {
        line: usize,
        attribute: Attribute,
        index: i64,
        available: usize,
    },
}

impl LoadWarning {
    pub fn line(&self) -> usize {
        match self {
            LoadWarning::MalformedRecord { line, .. }
            | LoadWarning::UnknownLineType { line, .. }
            | LoadWarning::DanglingIndex { line, .. } => *line,
        }
    }
}
