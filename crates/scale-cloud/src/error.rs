//! Fleet registry error types

use std::path::PathBuf;
use thiserror::Error;

/// Fleet registry errors
#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to decode registry at line {line}, column {column} (byte {offset}): {message}")]
    Decode {
        message: String,
        line: usize,
        column: usize,
        offset: usize,
    },

    #[error("Registry format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Host already exists: {0}")]
    DuplicateHost(String),

    #[error("Could not allocate a unique host name after {attempts} attempts")]
    NameExhaustion { attempts: usize },

    #[error("Unregister request failed for {host}: {message}")]
    Transport { host: String, message: String },

    #[error("Registry file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FleetError {
    /// Build a decode error from a serde_json failure, resolving the byte
    /// offset of the failure inside `input`.
    pub(crate) fn decode(err: serde_json::Error, input: &[u8]) -> Self {
        let line = err.line();
        let column = err.column();
        Self::Decode {
            message: err.to_string(),
            line,
            column,
            offset: byte_offset(input, line, column),
        }
    }

    /// True for errors caused by a corrupt or incompatible registry document
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::UnsupportedVersion { .. })
    }
}

/// serde_json reports 1-based lines and columns; 0 means "unknown".
fn byte_offset(input: &[u8], line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = input
        .split(|b| *b == b'\n')
        .take(line - 1)
        .map(|l| l.len() + 1)
        .sum();
    (line_start + column.saturating_sub(1)).min(input.len())
}

pub type Result<T> = std::result::Result<T, FleetError>;
