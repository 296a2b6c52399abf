use std::path::{Path, PathBuf};
use bitpacker_schema::Schema;
use crate::{
    error::CompileError,
    gen_rust::RustBackend,
};

/// Settings for one code generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Wrap the generated code in `pub mod <package>` (or the target
    /// language's equivalent).
    pub package:     Option<String>,
    pub version:     String,
    /// Generated messages zlib-compress their whole encoded form.
    pub compress:    bool,
    /// Emit type definitions and codec implementations as separate files.
    pub split_files: bool,
}

impl GeneratorConfig {
    pub fn for_schema(schema: &Schema) -> GeneratorConfig {
        GeneratorConfig {
            package:     None,
            version:     schema.version.clone(),
            compress:    false,
            split_files: false,
        }
    }
}

/// One generated output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub contents:  String,
}

/// A code generator for one target language. Backends only see verified
/// schemas and must produce code that matches the wire format exactly.
pub trait Backend {
    /// Canonical language id, also used as the output subdirectory.
    fn id(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn emit(&self, schema: &Schema, config: &GeneratorConfig) -> Result<Vec<Artifact>, CompileError>;
}

static BACKENDS: &[&(dyn Backend + Sync)] = &[&RustBackend];

/// Looks up a backend by id or alias, ignoring case.
pub fn backend_for(lang: &str) -> Result<&'static dyn Backend, CompileError> {
    let lang = lang.trim().to_ascii_lowercase();
    BACKENDS
        .iter()
        .find(|b| b.id() == lang || b.aliases().contains(&lang.as_str()))
        .map(|b| *b as &'static dyn Backend)
        .ok_or(CompileError::UnsupportedLanguage(lang))
}

/// Ids of every available backend.
pub fn backend_ids() -> Vec<&'static str> {
    BACKENDS.iter().map(|b| b.id()).collect()
}

/// Writes `artifacts` into `dir`, creating it if needed, and returns the
/// paths written.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, CompileError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.contents)?;
        log::debug!("wrote {} ({} bytes)", path.display(), artifact.contents.len());
        written.push(path);
    }
    Ok(written)
}
