//! bitpacker-compiler
//!
//! This crate implements:
//!  1) A tokenizer + line parser for `.buff` schema files,
//!  2) A verifier (missing version, duplicate names, unknown types, classes
//!     that contain themselves by value),
//!  3) `compile_schema` / `compile_file` producing the validated [`Schema`] IR,
//!  4) The [`Backend`] contract and the Rust code generator,
//!  5) Error types (`CompileError`).
//!
//! [`Schema`]: bitpacker_schema::Schema

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod verifier;
pub mod compiler;
pub mod backend;
pub mod gen_rust;

pub use backend::{backend_for, backend_ids, write_artifacts, Artifact, Backend, GeneratorConfig};
pub use compiler::{compile_file, compile_schema};
pub use error::CompileError;
pub use gen_rust::RustBackend;
