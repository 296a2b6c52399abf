use thiserror::Error;
use bitpacker_compiler::CompileError;
use bitpacker_schema::WireError;

/// Any failure a BitPacker tool can hit, from reading a schema to decoding
/// a message.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
