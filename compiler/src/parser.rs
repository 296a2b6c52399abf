use crate::{
    tokenizer::Token,
    types::{ClassDecl, FieldDecl, SchemaDecl},
    utils::{quote, syntax_error},
    error::CompileError,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER:    Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref VERSION_VALUE: Regex = Regex::new(r#"^([A-Za-z0-9_.\-]+|"[^"]*")$"#).unwrap();
}

/// What a single source line declares.
#[derive(Debug, PartialEq)]
enum Statement<'t> {
    Version(String),
    ClassOpen { name: &'t Token, closed: bool },
    Field { type_: &'t Token, name: &'t Token, is_array: bool },
    ClassClose,
}

fn is_ident(text: &str) -> bool {
    IDENTIFIER.is_match(text)
}

fn classify(line: &[Token]) -> Result<Statement<'_>, CompileError> {
    let texts: Vec<&str> = line.iter().map(|t| t.text.as_str()).collect();

    match texts.as_slice() {
        ["version", "=", value] if VERSION_VALUE.is_match(value) => {
            Ok(Statement::Version(value.trim_matches('"').to_owned()))
        }
        ["class", name, "{"] if is_ident(name) => Ok(Statement::ClassOpen {
            name:   &line[1],
            closed: false,
        }),
        ["class", name, "{", "}"] if is_ident(name) => Ok(Statement::ClassOpen {
            name:   &line[1],
            closed: true,
        }),
        ["}"] => Ok(Statement::ClassClose),
        [type_, name, ";"] if is_ident(type_) && is_ident(name) => Ok(Statement::Field {
            type_:    &line[0],
            name:     &line[1],
            is_array: false,
        }),
        [type_, "[]", name, ";"] if is_ident(type_) && is_ident(name) => {
            if line[1].column != line[0].end_column() {
                return Err(syntax_error(
                    "'[]' must directly follow the type name",
                    line[1].line,
                    line[1].column,
                ));
            }
            Ok(Statement::Field {
                type_:    &line[0],
                name:     &line[2],
                is_array: true,
            })
        }
        _ => Err(syntax_error(&quote(&texts.join(" ")), line[0].line, line[0].column)),
    }
}

/// Runs the line state machine over `tokens`. Only syntax and nesting are
/// checked here; type names are resolved by the verifier.
pub fn parse_schema(tokens: &[Token]) -> Result<SchemaDecl, CompileError> {
    let mut schema = SchemaDecl::default();
    let mut current: Option<ClassDecl> = None;

    for line in tokens.chunk_by(|a, b| a.line == b.line) {
        let line_no = line[0].line;

        match classify(line)? {
            Statement::Version(version) => {
                // Last one wins.
                schema.version = Some(version);
            }

            Statement::ClassOpen { name, closed } => {
                if current.is_some() {
                    return Err(CompileError::NestedClass { line: line_no });
                }
                let class = ClassDecl {
                    name:   name.text.clone(),
                    line:   line_no,
                    fields: Vec::new(),
                };
                if closed {
                    schema.classes.push(class);
                } else {
                    current = Some(class);
                }
            }

            Statement::Field { type_, name, is_array } => match current.as_mut() {
                Some(class) => class.fields.push(FieldDecl {
                    type_name: type_.text.clone(),
                    name:      name.text.clone(),
                    is_array,
                    line:      line_no,
                }),
                None => return Err(CompileError::FieldOutsideClass { line: line_no }),
            },

            Statement::ClassClose => match current.take() {
                Some(class) => schema.classes.push(class),
                None => return Err(CompileError::UnexpectedBrace { line: line_no }),
            },
        }
    }

    if let Some(class) = current {
        return Err(CompileError::UnclosedClass {
            name: class.name,
            line: class.line,
        });
    }

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_schema;

    fn parse(text: &str) -> Result<SchemaDecl, CompileError> {
        parse_schema(&tokenize_schema(text)?)
    }

    #[test]
    fn parses_classes_and_fields() {
        let schema = parse(
            r#"
            // game state
            version = "1.2.2"

            class Player {
                string name;
                int[] scores;
                Vec3 position;
            }

            class Vec3 {
                float x;
            }
            "#,
        )
        .unwrap();

        assert_eq!(schema.version.as_deref(), Some("1.2.2"));
        assert_eq!(schema.classes.len(), 2);

        let player = &schema.classes[0];
        assert_eq!(player.name, "Player");
        assert_eq!(player.line, 5);
        assert_eq!(player.fields.len(), 3);
        assert_eq!(player.fields[1], FieldDecl {
            type_name: "int".into(),
            name:      "scores".into(),
            is_array:  true,
            line:      7,
        });
        assert_eq!(player.fields[2].type_name, "Vec3");
        assert!(!player.fields[2].is_array);
        assert_eq!(schema.classes[1].fields[0].name, "x");
    }

    #[test]
    fn last_version_wins() {
        let schema = parse("version = 1.0\nversion = 1.1\nclass A {}").unwrap();
        assert_eq!(schema.version.as_deref(), Some("1.1"));
        assert_eq!(schema.classes[0].name, "A");
        assert!(schema.classes[0].fields.is_empty());
    }

    #[test]
    fn rejects_nested_class() {
        let err = parse("version = 1\nclass A {\nclass B {\n}\n}").unwrap_err();
        assert!(matches!(err, CompileError::NestedClass { line: 3 }), "{:?}", err);
        assert_eq!(err.to_string(), "line 3: nested classes not supported");
    }

    #[test]
    fn rejects_stray_brace() {
        let err = parse("version = 1\nclass A {\n}\n}").unwrap_err();
        assert!(matches!(err, CompileError::UnexpectedBrace { line: 4 }), "{:?}", err);
        assert_eq!(err.to_string(), "line 4: unexpected '}'");
    }

    #[test]
    fn rejects_field_outside_class() {
        let err = parse("version = 1\nint x;").unwrap_err();
        assert!(matches!(err, CompileError::FieldOutsideClass { line: 2 }), "{:?}", err);
    }

    #[test]
    fn reports_syntax_error_line() {
        let err = parse("version = 1\nclass A {\n  int x\n}").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("\"int x\""), "{}", err);

        let err = parse("version = 1\n\n\nstruct A {\n}").unwrap_err();
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn array_marker_must_touch_type() {
        assert!(parse("version = 1\nclass A {\n  int[] x;\n}").is_ok());
        let err = parse("version = 1\nclass A {\n  int [] x;\n}").unwrap_err();
        assert!(matches!(err, CompileError::Syntax { line: 3, column: 7, .. }), "{:?}", err);
    }

    #[test]
    fn rejects_unclosed_class() {
        let err = parse("version = 1\nclass A {\n  int x;\n").unwrap_err();
        assert!(matches!(err, CompileError::UnclosedClass { line: 2, .. }), "{:?}", err);
    }
}
