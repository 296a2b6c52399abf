use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}, column {column}: syntax error: {msg}")]
    Syntax {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("line {line}: nested classes not supported")]
    NestedClass { line: usize },

    #[error("line {line}: unexpected '}}'")]
    UnexpectedBrace { line: usize },

    #[error("line {line}: field outside class")]
    FieldOutsideClass { line: usize },

    #[error("line {line}: class '{name}' is never closed")]
    UnclosedClass { name: String, line: usize },

    #[error("missing version definition")]
    MissingVersion,

    #[error("no classes defined")]
    NoClasses,

    #[error("line {line}: the type name '{name}' is reserved")]
    ReservedName { name: String, line: usize },

    #[error("line {line}: class '{name}' is defined twice")]
    DuplicateClass { name: String, line: usize },

    #[error("line {line}: field '{class}.{field}' is defined twice")]
    DuplicateField {
        class: String,
        field: String,
        line:  usize,
    },

    #[error("unknown type '{type_}' for field '{class}.{field}'")]
    UnknownType {
        class: String,
        field: String,
        type_: String,
        line:  usize,
    },

    #[error("line {line}: field '{class}.{field}' embeds '{type_}' by value, which closes a cycle; use an array field instead")]
    RecursiveEmbedding {
        class: String,
        field: String,
        type_: String,
        line:  usize,
    },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl CompileError {
    /// The 1-based source line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match *self {
            CompileError::Syntax { line, .. }
            | CompileError::NestedClass { line }
            | CompileError::UnexpectedBrace { line }
            | CompileError::FieldOutsideClass { line }
            | CompileError::UnclosedClass { line, .. }
            | CompileError::ReservedName { line, .. }
            | CompileError::DuplicateClass { line, .. }
            | CompileError::DuplicateField { line, .. }
            | CompileError::UnknownType { line, .. }
            | CompileError::RecursiveEmbedding { line, .. } => Some(line),
            _ => None,
        }
    }
}
