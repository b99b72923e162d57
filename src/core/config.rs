//! Purpose: Resolve where the converter reads the key file and writes the key map.
//! Exports: `KeyfileConfig`, `DEFAULT_INPUT_NAME`, `DEFAULT_OUTPUT_NAME`, `executable_dir`.
//! Role: Explicit configuration handed to `convert::run`; callers decide the paths.
//! Invariants: Default file names are `ipm_key_mpi.txt` and `ipm_key_mpi.json`.
//! Invariants: Defaults are resolved against a directory, never the working directory implicitly.

use std::path::{Path, PathBuf};

use super::error::{Error, ErrorKind};
use super::keyfile::ErrorPolicy;

pub const DEFAULT_INPUT_NAME: &str = "ipm_key_mpi.txt";
pub const DEFAULT_OUTPUT_NAME: &str = "ipm_key_mpi.json";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyfileConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub errors: ErrorPolicy,
}

impl KeyfileConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            errors: ErrorPolicy::default(),
        }
    }

    /// Default file names inside `dir`.
    pub fn beside(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_INPUT_NAME), dir.join(DEFAULT_OUTPUT_NAME))
    }

    /// Default file names next to the running binary.
    pub fn beside_executable() -> Result<Self, Error> {
        executable_dir().map(|dir| Self::beside(&dir))
    }

    pub fn with_errors(mut self, errors: ErrorPolicy) -> Self {
        self.errors = errors;
        self
    }
}

pub fn executable_dir() -> Result<PathBuf, Error> {
    let exe = std::env::current_exe().map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("cannot locate the running executable")
            .with_hint("Pass --input and --output, or --dir.")
            .with_source(err)
    })?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("executable path has no parent directory")
            .with_path(&exe)
            .with_hint("Pass --input and --output, or --dir.")
    })
}
