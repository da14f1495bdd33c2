//! Error types shared by every coder.

use crate::color::ColorSpace;

/// Result type alias for swatch-codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad family of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: bad magic, truncated data, unknown tags.
    Format,
    /// A value violates a model invariant or an index is out of range.
    Validation,
    /// A colorspace or gradient transformation cannot be performed.
    Conversion,
    /// The requested operation is not available.
    Capability,
    /// Underlying I/O or serializer failure.
    Io,
}

/// Errors raised while building, converting, decoding or encoding
/// palettes and gradients.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of data at offset {offset}: {needed} more bytes needed")]
    UnexpectedEof { offset: usize, needed: usize },
    #[error("invalid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: String, found: String },
    #[error("unsupported version {0}")]
    UnsupportedVersion(String),
    #[error("unknown {what} tag {tag:#06x}")]
    UnknownTag { what: &'static str, tag: u32 },
    #[error("byte pattern not found before end of data")]
    PatternNotFound,
    #[error("invalid string data")]
    InvalidString,
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("group already open")]
    GroupAlreadyOpen,
    #[error("group not open")]
    GroupNotOpen,
    #[error("group not terminated before end of data")]
    UnterminatedGroup,

    #[error("{space:?} colors need {expected} components, got {actual}")]
    InvalidComponentCountForModel { space: ColorSpace, expected: usize, actual: usize },
    #[error("{what} index {index} out of range (length {len})")]
    IndexOutOfRange { what: &'static str, index: usize, len: usize },

    #[error("cannot convert {from:?} to {to:?}")]
    UnsupportedConversion { from: ColorSpace, to: ColorSpace },
    #[error("cannot normalize gradient: {0}")]
    CannotNormalize(&'static str),

    #[error("{operation} is not implemented by the {coder} coder")]
    NotImplemented { coder: &'static str, operation: &'static str },
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("coder {coder} only handles {expected}")]
    UnsupportedModel { coder: &'static str, expected: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            UnexpectedEof { .. } | InvalidMagic { .. } | UnsupportedVersion(_)
            | UnknownTag { .. } | PatternNotFound | InvalidString
            | InvalidData(_) | GroupAlreadyOpen | GroupNotOpen
            | UnterminatedGroup => ErrorKind::Format,
            InvalidComponentCountForModel { .. } | IndexOutOfRange { .. } =>
                ErrorKind::Validation,
            UnsupportedConversion { .. } | CannotNormalize(_) =>
                ErrorKind::Conversion,
            NotImplemented { .. } | UnsupportedFormat(_) | UnsupportedModel { .. } =>
                ErrorKind::Capability,
            Json(e) if !e.is_io() => ErrorKind::Format,
            Io(_) | Json(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidData(msg.into())
    }
}
