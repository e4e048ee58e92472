use replicator_reflection::ReflectionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Module resolver used before a module manifest was loaded")]
    NotPrimed,

    #[error("Malformed {what}: {reason}")]
    Malformed { what: String, reason: String },

    /// Not a failure: the class was deliberately excluded and is skipped.
    #[error("Class {0} is on the ignore list")]
    Ignored(String),

    #[error("Unable to find the header file declaring {class}")]
    HeaderNotFound { class: String },

    #[error("Directory does not exist: {}", .0.display())]
    DirMissing(PathBuf),

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Reflection(#[from] ReflectionError),
}

pub type Result<T> = std::result::Result<T, GenError>;
