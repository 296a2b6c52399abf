//! Core types for the BitPacker wire format: the validated schema IR, the
//! byte buffers every encoder and decoder is built from, and a dynamic
//! [`Value`] codec that can read or write any message described by a schema.
//!
//! ```
//! use bitpacker_schema::*;
//!
//! let schema = Schema::new("1.0", vec![
//!     Class::new("Point", vec![
//!         Field::new("x", FieldType::Primitive(Primitive::Int), false),
//!         Field::new("y", FieldType::Primitive(Primitive::Float), false),
//!     ]),
//! ]);
//!
//! let bytes = [3, 49, 46, 48, 2, 144, 78];
//! let value = Value::decode_message(&schema, &bytes).unwrap();
//! assert_eq!(format!("{:?}", value), "Point {x: 1, y: 0.5}");
//! assert_eq!(value.encode_message(&schema).unwrap(), bytes);
//! ```

pub mod bb;
pub mod error;
pub mod schema;
pub mod value;
#[cfg(test)]
mod proptest_roundtrip;

pub use bb::*;
pub use error::WireError;
pub use schema::*;
pub use value::*;

/// Floats travel as `(value * FLOAT_SCALE) as i64`, zig-zag varint encoded.
pub const FLOAT_SCALE: f64 = 10000.0;
