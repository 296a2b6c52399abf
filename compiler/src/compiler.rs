use std::path::Path;
use bitpacker_schema::Schema;
use crate::{
    verifier::verify_schema,
    tokenizer::tokenize_schema,
    parser::parse_schema,
    error::CompileError,
};

/// Compile schema source text into a validated [`Schema`].
/// `source_name` is recorded on the schema for diagnostics.
pub fn compile_schema(text: &str, source_name: &str) -> Result<Schema, CompileError> {
    let tokens = tokenize_schema(text)?;
    log::debug!("{}: {} tokens", source_name, tokens.len());

    let decl = parse_schema(&tokens)?;
    log::debug!("{}: parsed {} class(es)", source_name, decl.classes.len());

    verify_schema(decl, source_name)
}

/// Read and compile a schema file. The file stem becomes the schema's
/// source name.
pub fn compile_file<P: AsRef<Path>>(path: P) -> Result<Schema, CompileError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let source_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_owned());

    log::debug!("compiling {}", path.display());
    compile_schema(&text, &source_name)
}
