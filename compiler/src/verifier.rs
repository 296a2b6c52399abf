use std::collections::{HashMap, HashSet};
use bitpacker_schema::{Class, Field, FieldType, Primitive, Schema};
use crate::{
    types::SchemaDecl,
    error::CompileError,
};

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    InProgress,
    Done,
}

/// Checks a parsed schema and resolves it into the IR. Returns the first
/// problem found; nothing is generated from a schema that fails here.
pub fn verify_schema(decl: SchemaDecl, source_name: &str) -> Result<Schema, CompileError> {
    let version = match decl.version {
        Some(version) if !version.is_empty() => version,
        _ => return Err(CompileError::MissingVersion),
    };
    if decl.classes.is_empty() {
        return Err(CompileError::NoClasses);
    }

    // 1) Every class name is registered before any field is looked at, so
    //    fields may refer to classes declared later or to their own class.
    let mut class_names: HashSet<&str> = HashSet::new();
    for class in &decl.classes {
        if Primitive::from_name(&class.name).is_some() {
            return Err(CompileError::ReservedName {
                name: class.name.clone(),
                line: class.line,
            });
        }
        if !class_names.insert(class.name.as_str()) {
            return Err(CompileError::DuplicateClass {
                name: class.name.clone(),
                line: class.line,
            });
        }
    }

    // 2) Resolve field types
    let mut classes = Vec::with_capacity(decl.classes.len());
    for class in &decl.classes {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(class.fields.len());
        for field in &class.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CompileError::DuplicateField {
                    class: class.name.clone(),
                    field: field.name.clone(),
                    line:  field.line,
                });
            }
            let type_ = if let Some(primitive) = Primitive::from_name(&field.type_name) {
                FieldType::Primitive(primitive)
            } else if class_names.contains(field.type_name.as_str()) {
                FieldType::Class(field.type_name.clone())
            } else {
                return Err(CompileError::UnknownType {
                    class: class.name.clone(),
                    field: field.name.clone(),
                    type_: field.type_name.clone(),
                    line:  field.line,
                });
            };
            fields.push(Field {
                name:     field.name.clone(),
                type_,
                is_array: field.is_array,
                line:     field.line,
            });
        }
        classes.push(Class {
            name:   class.name.clone(),
            fields,
            line:   class.line,
        });
    }

    // 3) Check that classes do not contain themselves by value
    let by_name: HashMap<&str, &Class> = classes.iter().map(|c| (c.name.as_str(), c)).collect();
    let mut state: HashMap<&str, Visit> = HashMap::new();

    fn check_embedding<'c>(
        class: &'c Class,
        by_name: &HashMap<&str, &'c Class>,
        state: &mut HashMap<&'c str, Visit>,
    ) -> Result<(), CompileError> {
        if state.get(class.name.as_str()) == Some(&Visit::Done) {
            return Ok(());
        }
        state.insert(class.name.as_str(), Visit::InProgress);
        for field in &class.fields {
            if field.is_array {
                continue;
            }
            if let FieldType::Class(ref name) = field.type_ {
                if state.get(name.as_str()) == Some(&Visit::InProgress) {
                    return Err(CompileError::RecursiveEmbedding {
                        class: class.name.clone(),
                        field: field.name.clone(),
                        type_: name.clone(),
                        line:  field.line,
                    });
                }
                if let Some(inner) = by_name.get(name.as_str()) {
                    check_embedding(inner, by_name, state)?;
                }
            }
        }
        state.insert(class.name.as_str(), Visit::Done);
        Ok(())
    }

    for class in &classes {
        check_embedding(class, &by_name, &mut state)?;
    }

    log::debug!("verified {} class(es), version {}", classes.len(), version);

    Ok(Schema {
        version,
        classes,
        source_name: source_name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema};

    fn verify(text: &str) -> Result<Schema, CompileError> {
        let tokens = tokenize_schema(text)?;
        verify_schema(parse_schema(&tokens)?, "test")
    }

    #[test]
    fn resolves_types_in_any_order() {
        let schema = verify(
            "version = 2\nclass A {\n  B b;\n  A[] more;\n  float f;\n}\nclass B {\n  bool ok;\n}",
        )
        .unwrap();
        let a = schema.class("A").unwrap();
        assert_eq!(a.fields[0].type_, FieldType::Class("B".into()));
        assert_eq!(a.fields[1].type_, FieldType::Class("A".into()));
        assert!(a.fields[1].is_array);
        assert_eq!(a.fields[2].type_, FieldType::Primitive(Primitive::Float));
        assert_eq!(schema.source_name, "test");
    }

    #[test]
    fn requires_version_and_classes() {
        assert!(matches!(verify("class A {\n}"), Err(CompileError::MissingVersion)));
        assert!(matches!(verify("version = \"\"\nclass A {\n}"), Err(CompileError::MissingVersion)));
        assert!(matches!(verify("version = 1"), Err(CompileError::NoClasses)));
    }

    #[test]
    fn rejects_unknown_type() {
        let err = verify("version = 1\nclass Foo {\n  Bar b;\n}").unwrap_err();
        assert_eq!(err.to_string(), "unknown type 'Bar' for field 'Foo.b'");
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn extended_types_are_not_accepted() {
        for ty in ["long", "double"] {
            let text = format!("version = 1\nclass Foo {{\n  {} v;\n}}", ty);
            assert!(matches!(verify(&text), Err(CompileError::UnknownType { .. })), "{}", ty);
        }
    }

    #[test]
    fn rejects_duplicates_and_reserved_names() {
        assert!(matches!(
            verify("version = 1\nclass A {\n}\nclass A {\n}"),
            Err(CompileError::DuplicateClass { line: 4, .. })
        ));
        assert!(matches!(
            verify("version = 1\nclass A {\n  int x;\n  bool x;\n}"),
            Err(CompileError::DuplicateField { line: 4, .. })
        ));
        assert!(matches!(
            verify("version = 1\nclass string {\n}"),
            Err(CompileError::ReservedName { .. })
        ));
    }

    #[test]
    fn allows_self_reference_through_arrays_only() {
        assert!(verify("version = 1\nclass Node {\n  Node[] children;\n}").is_ok());

        let err = verify("version = 1\nclass Node {\n  Node next;\n}").unwrap_err();
        assert!(matches!(err, CompileError::RecursiveEmbedding { ref field, .. } if field == "next"), "{:?}", err);

        let err = verify("version = 1\nclass A {\n  B b;\n}\nclass B {\n  A a;\n}").unwrap_err();
        assert!(
            matches!(err, CompileError::RecursiveEmbedding { ref class, ref type_, .. } if class == "B" && type_ == "A"),
            "{:?}",
            err
        );
        assert_eq!(
            err.to_string(),
            "line 6: field 'B.a' embeds 'A' by value, which closes a cycle; use an array field instead"
        );

        assert!(verify("version = 1\nclass A {\n  B b;\n}\nclass B {\n  A[] a;\n}").is_ok());
    }
}
