use std::path::PathBuf;

use thiserror::Error;

/// Error type returned by every stage of the rowscan pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// No input paths were supplied.
    #[error("no input paths supplied")]
    NoInputPaths,

    /// An input path does not exist on disk.
    #[error("input path does not exist: {}", path.display())]
    MissingPath { path: PathBuf },

    /// Discovery finished without finding a single source file.
    #[error("no Rust source files found in the supplied paths")]
    NoSourceFiles,

    /// The source path was empty.
    #[error("no source file path supplied")]
    EmptySourcePath,

    /// Reading a source file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid Rust.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    /// The generation request cannot be rendered.
    #[error("invalid generation input: {message}")]
    Input { message: String },

    /// The output path was empty.
    #[error("no output file path supplied")]
    EmptyOutputPath,

    /// Writing the generated file failed.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendered code did not parse back as a Rust file.
    #[error("generated code is not valid Rust: {0}")]
    Generation(#[source] syn::Error),
}

impl Error {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::Input { message: message.into() }
    }

    /// True for errors raised while locating input files.
    pub fn is_discovery(&self) -> bool {
        matches!(self, Self::NoInputPaths | Self::MissingPath { .. } | Self::NoSourceFiles)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
