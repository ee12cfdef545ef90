//! Unified error type for the phyled-lib crate.
//!
//! [`PhyledError`] wraps the register-access error (`MdioError`), I/O errors,
//! and configuration/output errors. `From` impls let `?` propagate across
//! module boundaries.

use std::fmt;

use crate::mdio::MdioError;

/// Unified error type for phyled-lib operations.
#[derive(Debug)]
pub enum PhyledError {
    /// Management-bus error (interface lookup, identity, register I/O).
    Mdio(MdioError),
    /// Standard I/O error (console output).
    Io(std::io::Error),
    /// Invocation or output-formatting error.
    Config(String),
}

impl fmt::Display for PhyledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhyledError::Mdio(e) => write!(f, "{e}"),
            PhyledError::Io(e) => write!(f, "I/O error: {e}"),
            PhyledError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for PhyledError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PhyledError::Mdio(e) => Some(e),
            PhyledError::Io(e) => Some(e),
            PhyledError::Config(_) => None,
        }
    }
}

impl From<MdioError> for PhyledError {
    fn from(e: MdioError) -> Self {
        PhyledError::Mdio(e)
    }
}

impl From<std::io::Error> for PhyledError {
    fn from(e: std::io::Error) -> Self {
        PhyledError::Io(e)
    }
}

/// Crate-level Result alias using [`PhyledError`].
pub type Result<T> = std::result::Result<T, PhyledError>;
