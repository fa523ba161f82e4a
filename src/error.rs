//! Error types.
//!
//! The annotation core is total: [`crate::annotate`] never fails. Errors only
//! come from the edges of the crate, such as reading tables and configs, compiling
//! an oversized pattern, or the batch driver's empty-table precondition.

use std::io;

use thiserror::Error;

/// Errors produced by `wordtint`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors while reading or writing tables, configs or note collections.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The combined pattern could not be built.
    ///
    /// Words are always escaped, so this only happens when the compiled
    /// program exceeds the regex size limit.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// A batch run was requested with no usable word/color pairs.
    #[error("Color table is empty. Configure your color mappings first.")]
    EmptyTable,

    /// Structurally invalid configuration or entries data.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid caller-supplied argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_message_matches_driver_wording() {
        assert_eq!(Error::EmptyTable.to_string(), "Color table is empty. Configure your color mappings first.");
    }

    #[test]
    fn constructors_wrap_messages() {
        assert!(matches!(Error::config("bad"), Error::Config(m) if m == "bad"));
        assert_eq!(Error::invalid_argument("x").to_string(), "invalid argument: x");
    }
}
