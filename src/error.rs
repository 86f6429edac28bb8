//! Error types for the rendering engine.
//!
//! Everything here fires at construction time. Once a widget tree has been
//! built successfully, rendering itself does not fail; a panic during render
//! is a defect, not a recoverable condition.

use thiserror::Error;

/// Errors raised while building widgets or laying out text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// `truncate`/`fit` need at least one column to place the ellipsis in.
    #[error("cannot truncate to {0} columns (minimum is 1)")]
    InvalidColumns(usize),

    /// Embedded widgets must reserve at least one cell.
    #[error("embedded widget declared with width 0")]
    InvalidEmbedWidth,

    /// Only box-sized widgets can be embedded in flowing text.
    #[error("embedded widget must be box-sized")]
    NotBoxSized,

    /// Hyperlink targets cannot be empty.
    #[error("hyperlink URI is empty")]
    EmptyUri,

    /// Hyperlink targets must be printable ASCII after encoding.
    #[error("hyperlink URI contains non-printable byte 0x{0:02x}")]
    UriNotPrintable(u8),

    /// Hyperlink labels cannot be empty.
    #[error("hyperlink label is empty")]
    EmptyLabel,

    /// Hyperlink labels are a single line by contract.
    #[error("hyperlink label spans multiple lines")]
    MultilineLabel,
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, RenderError>;
