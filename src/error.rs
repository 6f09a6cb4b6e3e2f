//! Error taxonomy shared by the version resolver, boilerplate generator and
//! language helpers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LangError {
    /// Every configured version source failed.
    #[error(
        "Failed to fetch latest {runtime} FDK version. Check your network settings or manually \
         override the version by setting {env_var}"
    )]
    VersionResolution { runtime: String, env_var: String },

    #[error("Unsupported {runtime} version {version}")]
    UnsupportedVersion { runtime: String, version: String },

    /// Pre-build validation found no manifest in the working directory.
    #[error("Could not find {manifest} - {hint}")]
    MissingManifest { manifest: String, hint: String },

    #[error("{} already exists, refusing to overwrite function boilerplate", .0.display())]
    ManifestAlreadyExists(PathBuf),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LangError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LangError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LangError>;
