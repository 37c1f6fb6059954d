// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in the registrar return `error::Result<T>`.  Which
// failures are swallowed and which propagate is decided in `registrar`, not
// here; this module only classifies them.

use std::io;

/// Every error the registrar can produce.
#[derive(Debug)]
pub enum RegistrarError {
    /// The configuration key or value does not exist.
    NotFound,

    /// The caller lacks the rights the store operation needs
    /// (typically: writing machine scope without elevation).
    AccessDenied,

    /// Any other configuration-store failure.
    Store(io::Error),

    /// A Win32 API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// Reading the identity file failed.
    Io(io::Error),

    /// JSON encoding or decoding failed (identity file, status output).
    Config(serde_json::Error),

    /// The host has no registry or input-injection facility.
    Unsupported,
}

impl RegistrarError {
    /// `true` when the key or value being addressed does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl std::fmt::Display for RegistrarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "configuration key or value not found"),
            Self::AccessDenied => write!(f, "access to the configuration store was denied"),
            Self::Store(e) => write!(f, "configuration store error: {e}"),
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(e) => write!(f, "JSON error: {e}"),
            Self::Unsupported => write!(f, "Ease of Access integration requires Windows"),
        }
    }
}

impl std::error::Error for RegistrarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) | Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::NotFound | Self::AccessDenied | Self::Win32 { .. } | Self::Unsupported => None,
        }
    }
}

// Registry calls surface as `io::Error` (winreg maps the Win32 status code to
// an `ErrorKind`).  The two kinds callers care about get their own variants.
impl From<io::Error> for RegistrarError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::AccessDenied,
            _ => Self::Store(e),
        }
    }
}

impl From<serde_json::Error> for RegistrarError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegistrarError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
