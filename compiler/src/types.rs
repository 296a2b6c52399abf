use serde::Serialize;

/// A schema as written, before any semantic checks. Type names are still
/// plain strings and may refer to classes that do not exist.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct SchemaDecl {
    pub version: Option<String>,
    pub classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDecl {
    pub name:   String,
    pub line:   usize,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub type_name: String,
    pub name:      String,
    pub is_array:  bool,
    pub line:      usize,
}
