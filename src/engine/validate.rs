//! Pre-flight checks run before anything is probed or launched.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::core::{is_supported_input, supported_extensions_list};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Input file '{}' does not exist.", .0.display())]
    InputMissing(PathBuf),

    #[error(
        "Input file '{}' format not supported.\nSupported formats: {}",
        .0.display(),
        supported_extensions_list()
    )]
    UnsupportedFormat(PathBuf),

    #[error("{0} not found in PATH")]
    MissingDependency(String),
}

/// Validate the input path: it must exist and carry a supported extension
pub fn validate_input(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::InputMissing(path.to_path_buf()));
    }
    if !is_supported_input(path) {
        return Err(ValidationError::UnsupportedFormat(path.to_path_buf()));
    }
    Ok(())
}

/// Resolve each external tool on PATH (absolute paths are checked as-is)
pub fn check_dependencies(tools: &[&str]) -> Result<Vec<PathBuf>, ValidationError> {
    tools
        .iter()
        .map(|tool| {
            which::which(tool).map_err(|_| ValidationError::MissingDependency(tool.to_string()))
        })
        .collect()
}
