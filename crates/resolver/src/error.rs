use gop_imports::ExtractError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("fail to get imports({import_path}): {source}")]
    Extract {
        import_path: String,
        #[source]
        source: ExtractError,
    },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the same name file exist: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid import path: {0:?}")]
    InvalidImportPath(String),

    #[error("standard library listing failed: {0}")]
    StdLibList(String),
}

impl ResolveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn extract(import_path: impl Into<String>, source: ExtractError) -> Self {
        Self::Extract {
            import_path: import_path.into(),
            source,
        }
    }
}
