//! Loader CLI error types
//!
//! Failures reading a build import file; argument errors are reported by clap.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Cannot read build file {path}: {source}")]
    BuildFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid build file {path}: {message}")]
    InvalidBuildFile { path: String, message: String },
}
