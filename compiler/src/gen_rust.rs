use std::collections::HashSet;
use bitpacker_schema::{Class, Field, FieldType, Primitive, Schema};
use crate::{
    backend::{Artifact, Backend, GeneratorConfig},
    error::CompileError,
};

/// Generates plain Rust structs plus a `bitpacker::Message` impl per class.
/// The output has no inner attributes or `use` of crate-relative paths, so
/// it can be pulled in with `include!`.
pub struct RustBackend;

impl Backend for RustBackend {
    fn id(&self) -> &'static str {
        "rust"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn emit(&self, schema: &Schema, config: &GeneratorConfig) -> Result<Vec<Artifact>, CompileError> {
        let main = schema
            .main_class()
            .ok_or_else(|| CompileError::Backend("schema has no classes".into()))?;
        check_names(schema)?;
        if let Some(package) = &config.package {
            if !is_rust_ident(package) || escape_rust_keyword(package) != *package {
                return Err(CompileError::Backend(format!("'{}' is not a valid module name", package)));
            }
            if config.split_files {
                return Err(CompileError::Backend(
                    "a package module cannot span split files; drop one of the two options".into(),
                ));
            }
        }

        let base = to_snake_case(&main.name);
        log::debug!("rust: emitting {} class(es) for {}", schema.classes.len(), main.name);

        if config.split_files {
            let structs_mod = format!("{}_structs", base);
            let structs = [header(schema), generate_version(config), generate_structs(schema)];

            let mut impls = vec![header(schema), format!("use super::{}::*;\n", structs_mod)];
            impls.extend(generate_impls(schema, config));
            impls.push(generate_decode_fn(main));

            return Ok(vec![
                Artifact { file_name: format!("{}.rs", structs_mod),   contents: structs.join("\n") },
                Artifact { file_name: format!("{}_impl.rs", base),     contents: impls.join("\n") },
            ]);
        }

        let mut body = vec![generate_version(config), generate_structs(schema)];
        body.extend(generate_impls(schema, config));
        body.push(generate_decode_fn(main));
        let mut body = body.join("\n");

        if let Some(package) = &config.package {
            body = format!("pub mod {} {{\n{}}}\n", package, indent(&body));
        }

        Ok(vec![Artifact {
            file_name: format!("{}.rs", base),
            contents:  format!("{}\n{}", header(schema), body),
        }])
    }
}

/// Converts a string to snake_case.
/// Consecutive uppercase letters stay together, so "sessionID" becomes
/// "session_id" and "HTTPServer" becomes "http_server".
fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut snake = String::new();
    for i in 0..chars.len() {
        let c = chars[i];
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                if prev != '_'
                    && (!prev.is_uppercase() || (i + 1 < chars.len() && chars[i + 1].is_lowercase()))
                {
                    snake.push('_');
                }
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn",
    "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized",
    "virtual", "yield",
];

/// Names the generated code relies on resolving to the builtin types.
const RUST_BUILTIN_TYPES: &[&str] = &["i32", "f64", "str", "usize", "u8"];

/// Escapes Rust reserved keywords by suffixing with an underscore.
fn escape_rust_keyword(s: &str) -> String {
    if RUST_KEYWORDS.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

fn is_rust_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && s != "_"
}

fn field_ident(field: &Field) -> String {
    escape_rust_keyword(&to_snake_case(&field.name))
}

/// Class names become type names unchanged, so they must already be legal
/// there. Field names are converted, must come out as identifiers, and two
/// fields may not collapse onto the same Rust name.
fn check_names(schema: &Schema) -> Result<(), CompileError> {
    for class in &schema.classes {
        if RUST_KEYWORDS.contains(&class.name.as_str())
            || RUST_BUILTIN_TYPES.contains(&class.name.as_str())
            || !is_rust_ident(&class.name)
        {
            return Err(CompileError::Backend(format!(
                "class name '{}' is reserved in Rust",
                class.name
            )));
        }
        let mut seen = HashSet::new();
        for field in &class.fields {
            let ident = field_ident(field);
            if !is_rust_ident(&ident) {
                return Err(CompileError::Backend(format!(
                    "field '{}.{}' is not a usable Rust field name",
                    class.name, field.name
                )));
            }
            if !seen.insert(ident.clone()) {
                return Err(CompileError::Backend(format!(
                    "field '{}.{}' maps to the Rust name '{}' more than once",
                    class.name, field.name, ident
                )));
            }
        }
    }
    Ok(())
}

fn header(schema: &Schema) -> String {
    let source = if schema.source_name.is_empty() { "schema" } else { schema.source_name.as_str() };
    format!("// Generated by bitpacker from `{}`. Do not edit.\n", source)
}

fn generate_version(config: &GeneratorConfig) -> String {
    format!("pub const VERSION: &str = {:?};\n", config.version)
}

fn indent(code: &str) -> String {
    code.lines()
        .map(|line| if line.is_empty() { "\n".to_string() } else { format!("    {}\n", line) })
        .collect()
}

/// Maps schema types to Rust types.
fn map_type(type_: &FieldType) -> String {
    match type_ {
        FieldType::Primitive(Primitive::Int)    => "i32".to_string(),
        FieldType::Primitive(Primitive::Float)  => "f64".to_string(),
        FieldType::Primitive(Primitive::Bool)   => "bool".to_string(),
        FieldType::Primitive(Primitive::String) => "::std::string::String".to_string(),
        FieldType::Class(name)                  => name.clone(),
    }
}

fn generate_structs(schema: &Schema) -> String {
    schema
        .classes
        .iter()
        .map(generate_struct)
        .collect::<Vec<_>>()
        .join("\n")
}

fn generate_struct(class: &Class) -> String {
    let mut lines = Vec::new();
    lines.push("#[derive(Debug, Clone, PartialEq, Default, ::serde::Serialize, ::serde::Deserialize)]".to_string());
    lines.push(format!("pub struct {} {{", class.name));

    for field in &class.fields {
        let ident = field_ident(field);
        // The JSON key stays the schema name.
        if ident != field.name {
            lines.push(format!("    #[serde(rename = {:?})]", field.name));
        }
        let rust_type = map_type(&field.type_);
        if field.is_array {
            lines.push(format!("    pub {}: ::std::vec::Vec<{}>,", ident, rust_type));
        } else {
            lines.push(format!("    pub {}: {},", ident, rust_type));
        }
    }

    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}

fn generate_impls(schema: &Schema, config: &GeneratorConfig) -> Vec<String> {
    schema
        .classes
        .iter()
        .map(|class| generate_message_impl(class, config))
        .collect()
}

/// Writes one value held in `expr`. `by_ref` says whether `expr` is a
/// reference (array items) or a place (struct fields).
fn encode_value(type_: &FieldType, expr: &str, by_ref: bool) -> String {
    let deref = if by_ref { format!("*{}", expr) } else { expr.to_string() };
    let borrow = if by_ref { expr.to_string() } else { format!("&{}", expr) };
    match type_ {
        FieldType::Primitive(Primitive::Int)    => format!("bb.write_var_int({});", deref),
        FieldType::Primitive(Primitive::Float)  => format!("bb.write_float({});", deref),
        FieldType::Primitive(Primitive::Bool)   => format!("bb.write_bool({});", deref),
        FieldType::Primitive(Primitive::String) => format!("bb.write_string({});", borrow),
        FieldType::Class(_)                     => format!("::bitpacker::Message::encode_to({}, bb);", borrow),
    }
}

fn decode_value(type_: &FieldType) -> String {
    match type_ {
        FieldType::Primitive(Primitive::Int)    => "bb.read_var_int()?".to_string(),
        FieldType::Primitive(Primitive::Float)  => "bb.read_float()?".to_string(),
        FieldType::Primitive(Primitive::Bool)   => "bb.read_bool()?".to_string(),
        FieldType::Primitive(Primitive::String) => "bb.read_string()?.to_owned()".to_string(),
        FieldType::Class(name) => format!("<{} as ::bitpacker::Message>::decode_from(bb)?", name),
    }
}

fn generate_message_impl(class: &Class, config: &GeneratorConfig) -> String {
    let mut lines = Vec::new();
    lines.push(format!("impl ::bitpacker::Message for {} {{", class.name));
    lines.push("    const VERSION: &'static str = VERSION;".to_string());
    lines.push(format!("    const COMPRESSED: bool = {};", config.compress));
    lines.push(String::new());

    // Encoder
    if class.fields.is_empty() {
        lines.push("    fn encode_to(&self, _bb: &mut ::bitpacker::ByteBufferMut) {}".to_string());
    } else {
        lines.push("    fn encode_to(&self, bb: &mut ::bitpacker::ByteBufferMut) {".to_string());
        for field in &class.fields {
            let place = format!("self.{}", field_ident(field));
            if field.is_array {
                lines.push(format!("        bb.write_array_len({}.len());", place));
                lines.push(format!("        for item in &{} {{", place));
                lines.push(format!("            {}", encode_value(&field.type_, "item", true)));
                lines.push("        }".to_string());
            } else {
                lines.push(format!("        {}", encode_value(&field.type_, &place, false)));
            }
        }
        lines.push("    }".to_string());
    }
    lines.push(String::new());

    // Decoder. Struct expression fields evaluate in source order, which is
    // the wire order.
    lines.push(
        "    fn decode_from(bb: &mut ::bitpacker::ByteBuffer<'_>) -> ::core::result::Result<Self, ::bitpacker::WireError> {"
            .to_string(),
    );
    lines.push("        bb.enter()?;".to_string());
    lines.push("        let decoded = Self {".to_string());
    for field in &class.fields {
        let ident = field_ident(field);
        if field.is_array {
            lines.push(format!("            {}: {{", ident));
            lines.push("                let len = bb.read_array_len()?;".to_string());
            lines.push("                let mut items = ::std::vec::Vec::with_capacity(bb.capacity_hint(len));".to_string());
            lines.push("                for _ in 0..len {".to_string());
            lines.push(format!("                    items.push({});", decode_value(&field.type_)));
            lines.push("                }".to_string());
            lines.push("                items".to_string());
            lines.push("            },".to_string());
        } else {
            lines.push(format!("            {}: {},", ident, decode_value(&field.type_)));
        }
    }
    lines.push("        };".to_string());
    lines.push("        bb.leave();".to_string());
    lines.push("        ::core::result::Result::Ok(decoded)".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}

fn generate_decode_fn(main: &Class) -> String {
    format!(
        "/// Decodes a standalone `{name}` message.\n\
         pub fn decode(data: &[u8]) -> ::core::result::Result<{name}, ::bitpacker::WireError> {{\n    \
         <{name} as ::bitpacker::Message>::decode(data)\n\
         }}\n",
        name = main.name
    )
}
