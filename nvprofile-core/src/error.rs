use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("invalid profile archive {}: {reason}", .path.display())]
    InvalidArchive { path: PathBuf, reason: String },

    #[error("could not remove {}: {source}", .path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure category, for callers that only branch on what went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    SourceNotFound,
    InvalidArchive,
    CleanupFailed,
    IoFailure,
}

impl ProfileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::SourceNotFound(_) => ErrorKind::SourceNotFound,
            ProfileError::InvalidArchive { .. } => ErrorKind::InvalidArchive,
            ProfileError::CleanupFailed { .. } => ErrorKind::CleanupFailed,
            ProfileError::Io(_) => ErrorKind::IoFailure,
        }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ProfileError::InvalidArchive {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Zip failures while producing an archive are plain I/O failures.
pub(crate) fn from_zip_write(e: zip::result::ZipError) -> ProfileError {
    match e {
        zip::result::ZipError::Io(io) => ProfileError::Io(io),
        other => ProfileError::Io(std::io::Error::new(std::io::ErrorKind::Other, other)),
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(
            ProfileError::SourceNotFound(PathBuf::from("/nope")).kind(),
            ErrorKind::SourceNotFound
        );
        assert_eq!(
            ProfileError::invalid("a.nvdaprofile", "missing descriptor").kind(),
            ErrorKind::InvalidArchive
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        assert_eq!(ProfileError::from(io).kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn messages_name_the_path() {
        let e = ProfileError::CleanupFailed {
            path: PathBuf::from("cfg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "in use"),
        };
        let msg = e.to_string();
        assert!(msg.contains("cfg"), "{msg}");
        assert!(msg.contains("in use"), "{msg}");
    }
}
