use serde::Serialize;
use std::fmt;

/// The fixed set of scalar types a field can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Int,
    Float,
    Bool,
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 4] = [
        Primitive::Int,
        Primitive::Float,
        Primitive::Bool,
        Primitive::String,
    ];

    /// The spelling used in schema source.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Int    => "int",
            Primitive::Float  => "float",
            Primitive::Bool   => "bool",
            Primitive::String => "string",
        }
    }

    pub fn from_name(name: &str) -> Option<Primitive> {
        Primitive::ALL.iter().copied().find(|p| p.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldType {
    Primitive(Primitive),
    Class(String),
}

impl FieldType {
    pub fn name(&self) -> &str {
        match self {
            FieldType::Primitive(p) => p.name(),
            FieldType::Class(name)  => name.as_str(),
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, FieldType::Class(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:     String,
    #[serde(rename = "type")]
    pub type_:    FieldType,
    pub is_array: bool,
    /// 1-based source line, or 0 for fields built in code.
    pub line:     usize,
}

impl Field {
    pub fn new(name: &str, type_: FieldType, is_array: bool) -> Field {
        Field {
            name: name.to_owned(),
            type_,
            is_array,
            line: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub name:   String,
    pub fields: Vec<Field>,
    pub line:   usize,
}

impl Class {
    pub fn new(name: &str, fields: Vec<Field>) -> Class {
        Class {
            name: name.to_owned(),
            fields,
            line: 0,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A validated schema. The compiler is the only producer of these from
/// source text; once built they are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub version:     String,
    pub classes:     Vec<Class>,
    pub source_name: String,
}

impl Schema {
    pub fn new(version: &str, classes: Vec<Class>) -> Schema {
        Schema {
            version:     version.to_owned(),
            classes,
            source_name: String::new(),
        }
    }

    /// The first declared class, used as the entry point for standalone
    /// messages. Verified schemas always have one.
    pub fn main_class(&self) -> Option<&Class> {
        self.classes.first()
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }
}
