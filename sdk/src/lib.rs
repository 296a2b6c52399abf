//! bitpacker
//!
//! Runtime support for BitPacker messages.
//!
//! - [`Message`], implemented by generated code for every schema class
//! - zlib wrapping of whole messages ([`compress`])
//! - schema-driven encoding and decoding of dynamic [`Value`]s and JSON,
//!   for tools that only have a schema at runtime

pub mod compress;
pub mod error;
pub mod message;

pub use bitpacker_compiler::{compile_file, compile_schema, CompileError};
pub use bitpacker_schema::{
    ByteBuffer, ByteBufferMut, Class, Field, FieldType, Primitive, Schema, Value, WireError,
    FLOAT_SCALE, MAX_DEPTH,
};
pub use error::Error;
pub use message::{decode_message, Message};

/// Encode a dynamic value as a complete message of `schema`'s main class.
pub fn encode_value(schema: &Schema, value: &Value, compressed: bool) -> Result<Vec<u8>, WireError> {
    let bytes = value.encode_message(schema)?;
    if compressed {
        compress::deflate(&bytes)
    } else {
        Ok(bytes)
    }
}

/// Decode a complete message of `schema`'s main class into a dynamic value.
pub fn decode_value<'a>(schema: &'a Schema, bytes: &[u8], compressed: bool) -> Result<Value<'a>, WireError> {
    if compressed {
        let raw = compress::inflate(bytes)?;
        Value::decode_message(schema, &raw)
    } else {
        Value::decode_message(schema, bytes)
    }
}

/// Build a message of `schema`'s main class from JSON and encode it.
pub fn encode_json(schema: &Schema, json: &serde_json::Value, compressed: bool) -> Result<Vec<u8>, WireError> {
    let main = schema
        .main_class()
        .ok_or_else(|| WireError::UnknownClass(String::new()))?;
    let value = Value::from_json(schema, main, json)?;
    encode_value(schema, &value, compressed)
}

/// Decode a message into a pretty-printed JSON string.
pub fn decode_to_json(schema: &Schema, bytes: &[u8], compressed: bool) -> Result<String, Error> {
    let value = decode_value(schema, bytes, compressed)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
