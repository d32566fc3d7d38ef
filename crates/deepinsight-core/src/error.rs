use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session directory not found: {0}")]
    SessionDirNotFound(PathBuf),

    #[error("No session logs found in {0}")]
    NoSessions(PathBuf),

    #[error("Facet file not found: {0} (run the analysis stage first)")]
    FacetsNotFound(PathBuf),

    #[error("No facets to generate a report from")]
    NoFacets,
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::SessionDirNotFound(_) | Error::NoSessions(_) => 0,
            Error::FacetsNotFound(_) | Error::NoFacets => 1,
            Error::Io(_) | Error::Json(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
