use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("buffer underflow: needed {needed} byte(s) but only {remaining} remain")]
    BufferUnderflow {
        needed:    usize,
        remaining: usize,
    },

    #[error("varint is longer than 10 bytes")]
    VarintOverflow,

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid array length {0}")]
    InvalidLength(i32),

    #[error("version mismatch: expected {expected}, got {found}")]
    VersionMismatch {
        expected: String,
        found:    String,
    },

    #[error("unknown class \"{0}\"")]
    UnknownClass(String),

    #[error("missing field \"{class}.{field}\"")]
    MissingField {
        class: String,
        field: String,
    },

    #[error("field \"{field}\" expects {expected}")]
    TypeMismatch {
        field:    String,
        expected: String,
    },

    #[error("classes nested deeper than {0} levels")]
    DepthLimit(usize),

    #[error("compression error: {0}")]
    Compression(#[from] std::io::Error),
}

impl WireError {
    /// True for every error caused by running out of input.
    pub fn is_underflow(&self) -> bool {
        matches!(self, WireError::BufferUnderflow { .. })
    }
}
