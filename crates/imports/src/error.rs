use std::path::PathBuf;
use thiserror::Error;

/// Result type for import extraction
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while reading a Go package
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The directory holds no file that survives the build context.
    /// Callers treat this as an empty package, not a failure.
    #[error("no buildable Go source files in {}", dir.display())]
    NoBuildableSource { dir: PathBuf },

    /// The package directory does not exist
    #[error("cannot find package {import_path:?} in {}", dir.display())]
    PackageNotFound { import_path: String, dir: PathBuf },

    /// Files in one directory declare different package names
    #[error("found packages {first} and {second} in {}", dir.display())]
    MultiplePackages {
        dir: PathBuf,
        first: String,
        second: String,
    },

    /// Syntax error in the package clause or import block
    #[error("parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    /// Malformed `//go:build` or `// +build` line
    #[error("invalid build constraint in {}: {message}", file.display())]
    InvalidConstraint { file: PathBuf, message: String },

    /// IO error occurred
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl ExtractError {
    /// Create a parse error
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an IO error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }

    /// True for the "nothing to build here" condition
    pub fn is_no_buildable_source(&self) -> bool {
        matches!(self, Self::NoBuildableSource { .. })
    }
}
