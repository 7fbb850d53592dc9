//! Error types for the engine.
//!
//! All fallible engine operations return [`Result<T>`]. Variants follow the
//! failure taxonomy of the scene core: allocation, precondition violation,
//! backend (GPU) error, codec (persisted asset) error, and lookup miss.

use std::fmt;

/// Result type for scene-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error kinds.
#[derive(Debug, Clone)]
pub enum Error {
    /// CPU allocation failure (growing a segment, a geometry array, ...).
    Allocation(String),
    /// Wrong kind/index/stride, double registration, sphere outside octree
    /// root, operating on a detached or un-built object, etc.
    Precondition(String),
    /// GPU buffer mapping failure, VAO creation failure, or any other
    /// failure surfaced by the `Device` collaborator.
    Backend(String),
    /// Ill-formed persisted asset: bad magic, premature EOF, truncated
    /// record, version mismatch.
    Codec(String),
    /// A resource name resolved to no registered loader / cache entry.
    LookupMiss(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Allocation(msg) => write!(f, "allocation failure: {msg}"),
            Error::Precondition(msg) => write!(f, "precondition violation: {msg}"),
            Error::Backend(msg) => write!(f, "backend error: {msg}"),
            Error::Codec(msg) => write!(f, "codec error: {msg}"),
            Error::LookupMiss(msg) => write!(f, "lookup miss: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Builds an [`Error`], logs it at `Error` severity, and returns it from the
/// enclosing function.
#[macro_export]
macro_rules! engine_bail {
    ($kind:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($kind, $($arg)*))
    };
}

/// Builds an [`Error`] and logs it at `Error` severity, yielding the value
/// (for `.ok_or_else(|| engine_err!(...))` / `.map_err` use).
#[macro_export]
macro_rules! engine_err {
    ($kind:ident, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        $crate::engine_error!("scengine", "{}", msg);
        $crate::error::Error::$kind(msg)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
