use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for TTL operations
pub type Result<T> = std::result::Result<T, TtlError>;

/// Errors that can occur while reading, applying or persisting the TTL
#[derive(Error, Debug)]
pub enum TtlError {
    /// Candidate value outside the permitted bound
    #[error("TTL {value} is out of range ({min}..={max})")]
    OutOfRange {
        /// The rejected candidate
        value: i64,
        /// Lowest accepted TTL
        min: u8,
        /// Highest accepted TTL
        max: u8,
    },

    /// Caller lacks the rights to modify a control surface
    #[error("permission denied writing {}: root privileges are required", .path.display())]
    PermissionDenied {
        /// File that could not be written
        path: PathBuf,
    },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File involved in the failed operation
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A control file held something other than an integer
    #[error("could not parse {contents:?} from {} as a TTL", .path.display())]
    Parse {
        /// File that was read
        path: PathBuf,
        /// Trimmed contents of the file
        contents: String,
    },

    /// The kernel accepted the write but reports a different value
    #[error("TTL write not applied: expected {expected}, kernel reports {observed}")]
    Mismatch {
        /// Value that was written
        expected: u8,
        /// Value read back afterwards
        observed: u8,
    },

    /// An external helper process exited unsuccessfully
    #[error("{program} failed ({status}): {stderr}")]
    Helper {
        /// Program that was run
        program: String,
        /// Exit status as reported by the OS
        status: String,
        /// Trimmed standard error output
        stderr: String,
    },

    /// The persisted file was written but loading it into the kernel failed
    #[error("wrote {} but reloading it failed: {reason}", .path.display())]
    Reload {
        /// Persisted configuration file
        path: PathBuf,
        /// Why the reload failed
        reason: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of [`TtlError`] for callers that want to react
/// differently to a bad value versus a missing privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The candidate value was rejected before any side effect
    Validation,
    /// Elevated privilege was required but not available
    Privilege,
    /// Environment, file or kernel failure
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Privilege => write!(f, "privilege"),
            Self::Io => write!(f, "io"),
        }
    }
}

impl TtlError {
    /// Wrap an I/O error, promoting permission failures to
    /// [`TtlError::PermissionDenied`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Returns the error classification
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfRange { .. } => ErrorKind::Validation,
            Self::PermissionDenied { .. } => ErrorKind::Privilege,
            _ => ErrorKind::Io,
        }
    }

    /// Returns true if the error is a rejected candidate value
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }

    /// Returns true if the error is due to missing privilege
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self.kind(), ErrorKind::Privilege)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_permission_denied_is_privilege_kind() {
        let err = TtlError::io(
            "/proc/sys/net/ipv4/ip_default_ttl",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, TtlError::PermissionDenied { .. }));
        assert_eq!(err.kind(), ErrorKind::Privilege);
    }

    #[test]
    fn other_io_errors_stay_io_kind() {
        let err = TtlError::io("/nope", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(err, TtlError::Io { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn kinds() {
        let range = TtlError::OutOfRange { value: 10, min: 32, max: 128 };
        assert!(range.is_validation());
        assert!(!range.is_permission_denied());

        let mismatch = TtlError::Mismatch { expected: 65, observed: 64 };
        assert_eq!(mismatch.kind(), ErrorKind::Io);
    }

    #[test]
    fn helper_message() {
        let err = TtlError::Helper {
            program: "sysctl".into(),
            status: "exit status: 255".into(),
            stderr: "permission denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "sysctl failed (exit status: 255): permission denied"
        );
    }
}
