//! # Error Taxonomy
//!
//! Every fallible library operation returns [`ThemeError`]. The variants are
//! split so a front end can tell apart:
//!
//! | Variant | Meaning | Caller reaction |
//! |---------|---------|-----------------|
//! | `Validation` | bad palette, name clash, forbidden operation | show message |
//! | `NotFound` | theme name never existed | show message |
//! | `Permission` | filesystem refused a write | show "fix permissions on <path>" |
//! | `Io` | any other filesystem failure | show message |
//! | `Generate` | a config generator could not serialize its document | bug report |
//! | `Archive` / `Download` | import/export payload problems | show message |
//!
//! External-integration failures never appear here: they are logged and
//! swallowed where they happen (see [`crate::integrations`]).

use std::io;
use std::path::{Path, PathBuf};

/// Errors raised by theme, pointer, archive and preference operations.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// Input rejected before any mutation happened.
    #[error("{0}")]
    Validation(String),

    /// The referenced theme does not exist in either root.
    #[error("theme not found: {0}")]
    NotFound(String),

    /// The filesystem denied access to `path`.
    #[error("permission denied: {}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure on `path`.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A generator failed to serialize its output document.
    #[error("failed to generate {integration} config: {message}")]
    Generate {
        integration: &'static str,
        message: String,
    },

    /// The archive is not a usable theme export.
    #[error("invalid theme archive: {0}")]
    Archive(String),

    /// Fetching a remote archive failed.
    #[error("download failed: {0}")]
    Download(String),
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, ThemeError>;

impl ThemeError {
    /// Wrap an I/O error raised while touching `path`, tagging permission
    /// failures so they can be told apart from generic ones.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if is_permission_error(&source) {
            ThemeError::Permission {
                path: path.to_path_buf(),
                source,
            }
        } else {
            ThemeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Closure form of [`ThemeError::from_io`] for use with `map_err`.
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::from_io(path, source)
    }

    /// True for the permission-tagged variant.
    pub fn is_permission(&self) -> bool {
        matches!(self, ThemeError::Permission { .. })
    }

    /// True when the error means "no such theme".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ThemeError::NotFound(_))
    }

    /// True for rejected input / forbidden operations.
    pub fn is_validation(&self) -> bool {
        matches!(self, ThemeError::Validation(_))
    }

    /// A remediation hint for the user, when one exists.
    pub fn hint(&self) -> Option<String> {
        match self {
            ThemeError::Permission { path, .. } => Some(format!(
                "Check that you own {} and that it is writable (e.g. `chmod u+w`).",
                path.display()
            )),
            _ => None,
        }
    }
}

// EPERM, EACCES and EROFS share these numbers on Linux and macOS.
const EPERM: i32 = 1;
const EACCES: i32 = 13;
const EROFS: i32 = 30;

fn is_permission_error(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    matches!(err.raw_os_error(), Some(EPERM | EACCES | EROFS))
}

impl From<zip::result::ZipError> for ThemeError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(source) => ThemeError::Io {
                path: PathBuf::from("<archive>"),
                source,
            },
            other => ThemeError::Archive(other.to_string()),
        }
    }
}
