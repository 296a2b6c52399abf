use crate::{
    bb::{ByteBuffer, ByteBufferMut},
    error::WireError,
    schema::{Class, Field, FieldType, Primitive, Schema},
};

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::ops::Index;

/// This type holds dynamic BitPacker data.
///
/// Values can represent any instance of a class in a [Schema] and can be
/// converted to and from bytes using that schema, without generated code.
/// Class and field names are borrowed from the schema, so a Value can outlive
/// the buffer it was parsed from but can't outlive the schema. Object fields
/// keep declaration order.
#[derive(Clone, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    Int(i32),
    Float(f64),
    String(String),
    Array(Vec<Value<'a>>),
    Object(&'a str, IndexMap<&'a str, Value<'a>>),
}

impl<'a> Value<'a> {
    /// Returns `false` for other value kinds.
    pub fn as_bool(&self) -> bool {
        match *self {
            Value::Bool(value) => value,
            _ => false,
        }
    }

    /// Returns `0` for other value kinds.
    pub fn as_int(&self) -> i32 {
        match *self {
            Value::Int(value) => value,
            _ => 0,
        }
    }

    /// Returns `0.0` for other value kinds.
    pub fn as_float(&self) -> f64 {
        match *self {
            Value::Float(value) => value,
            _ => 0.0,
        }
    }

    /// Returns `""` for other value kinds.
    pub fn as_string(&self) -> &str {
        match *self {
            Value::String(ref value) => value.as_str(),
            _ => "",
        }
    }

    /// Returns an empty slice for other value kinds.
    pub fn as_array(&self) -> &[Value<'a>] {
        match *self {
            Value::Array(ref values) => values.as_slice(),
            _ => &[],
        }
    }

    /// Returns `0` for other value kinds.
    pub fn len(&self) -> usize {
        match *self {
            Value::Array(ref values) => values.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Does nothing for other value kinds.
    pub fn push(&mut self, value: Value<'a>) {
        if let Value::Array(ref mut values) = *self {
            values.push(value);
        }
    }

    /// Returns `None` for other value kinds or if the field isn't present.
    pub fn get(&self, name: &str) -> Option<&Value<'a>> {
        match *self {
            Value::Object(_, ref fields) => fields.get(name),
            _ => None,
        }
    }

    /// Does nothing for other value kinds.
    pub fn set(&mut self, name: &'a str, value: Value<'a>) {
        if let Value::Object(_, ref mut fields) = *self {
            fields.insert(name, value);
        }
    }

    /// Decodes a complete message: the version header followed by an
    /// instance of the schema's main class.
    pub fn decode_message(schema: &'a Schema, bytes: &[u8]) -> Result<Value<'a>, WireError> {
        let mut bb = ByteBuffer::new(bytes);
        bb.expect_version(&schema.version)?;
        let main = main_class(schema)?;
        log::trace!("decoding {} ({} bytes)", main.name, bytes.len());
        Value::decode_class(schema, main, &mut bb)
    }

    /// Encodes this value as a complete message. The value must be an
    /// instance of the schema's main class.
    pub fn encode_message(&self, schema: &Schema) -> Result<Vec<u8>, WireError> {
        let main = main_class(schema)?;
        let mut bb = ByteBufferMut::new();
        bb.write_string(&schema.version);
        self.encode_class(schema, main, &mut bb)?;
        log::trace!("encoded {} ({} bytes)", main.name, bb.len());
        Ok(bb.data())
    }

    /// Decodes the fields of `class` in declaration order, without a version
    /// header.
    pub fn decode_class(
        schema: &'a Schema,
        class: &'a Class,
        bb: &mut ByteBuffer,
    ) -> Result<Value<'a>, WireError> {
        bb.enter()?;
        let mut fields = IndexMap::with_capacity(class.fields.len());
        for field in &class.fields {
            fields.insert(field.name.as_str(), Value::decode_field(schema, field, bb)?);
        }
        bb.leave();
        Ok(Value::Object(class.name.as_str(), fields))
    }

    /// Decodes the field specified by `field` from `bb` starting at the
    /// current index, including the element count for array fields.
    pub fn decode_field(
        schema: &'a Schema,
        field: &'a Field,
        bb: &mut ByteBuffer,
    ) -> Result<Value<'a>, WireError> {
        if field.is_array {
            let len = bb.read_array_len()?;
            let mut array = Vec::with_capacity(bb.capacity_hint(len));
            for _ in 0..len {
                array.push(Value::decode_single(schema, &field.type_, bb)?);
            }
            Ok(Value::Array(array))
        } else {
            Value::decode_single(schema, &field.type_, bb)
        }
    }

    fn decode_single(
        schema: &'a Schema,
        type_: &'a FieldType,
        bb: &mut ByteBuffer,
    ) -> Result<Value<'a>, WireError> {
        match type_ {
            FieldType::Primitive(Primitive::Int)    => Ok(Value::Int(bb.read_var_int()?)),
            FieldType::Primitive(Primitive::Float)  => Ok(Value::Float(bb.read_float()?)),
            FieldType::Primitive(Primitive::Bool)   => Ok(Value::Bool(bb.read_bool()?)),
            FieldType::Primitive(Primitive::String) => Ok(Value::String(bb.read_string()?.to_owned())),
            FieldType::Class(name) => {
                let class = lookup_class(schema, name)?;
                Value::decode_class(schema, class, bb)
            }
        }
    }

    /// Encodes this value, which must be an object of `class`, field by field
    /// in declaration order.
    pub fn encode_class(
        &self,
        schema: &Schema,
        class: &Class,
        bb: &mut ByteBufferMut,
    ) -> Result<(), WireError> {
        let fields = match self {
            Value::Object(name, fields) if *name == class.name => fields,
            _ => return Err(mismatch(&class.name, &format!("an object of class {}", class.name))),
        };
        for field in &class.fields {
            let value = fields.get(field.name.as_str()).ok_or_else(|| WireError::MissingField {
                class: class.name.clone(),
                field: field.name.clone(),
            })?;
            value.encode_field(schema, field, bb)?;
        }
        Ok(())
    }

    /// Encodes this value as the contents of `field`.
    pub fn encode_field(
        &self,
        schema: &Schema,
        field: &Field,
        bb: &mut ByteBufferMut,
    ) -> Result<(), WireError> {
        if !field.is_array {
            return self.encode_single(schema, field, bb);
        }
        match self {
            Value::Array(values) => {
                bb.write_array_len(values.len());
                for value in values {
                    value.encode_single(schema, field, bb)?;
                }
                Ok(())
            }
            _ => Err(mismatch(&field.name, &format!("an array of {}", field.type_))),
        }
    }

    fn encode_single(
        &self,
        schema: &Schema,
        field: &Field,
        bb: &mut ByteBufferMut,
    ) -> Result<(), WireError> {
        match (&field.type_, self) {
            (FieldType::Primitive(Primitive::Int), Value::Int(v))       => bb.write_var_int(*v),
            (FieldType::Primitive(Primitive::Float), Value::Float(v))   => bb.write_float(*v),
            (FieldType::Primitive(Primitive::Bool), Value::Bool(v))     => bb.write_bool(*v),
            (FieldType::Primitive(Primitive::String), Value::String(v)) => bb.write_string(v),
            (FieldType::Class(name), Value::Object(..)) => {
                let class = lookup_class(schema, name)?;
                self.encode_class(schema, class, bb)?;
            }
            (type_, _) => return Err(mismatch(&field.name, type_.name())),
        }
        Ok(())
    }

    /// Builds an instance of `class` from JSON. Integers must fit in 32
    /// bits; any JSON number is accepted for floats; unknown keys are
    /// ignored.
    pub fn from_json(
        schema: &'a Schema,
        class: &'a Class,
        json: &serde_json::Value,
    ) -> Result<Value<'a>, WireError> {
        let object = json
            .as_object()
            .ok_or_else(|| mismatch(&class.name, "a JSON object"))?;
        let mut fields = IndexMap::with_capacity(class.fields.len());
        for field in &class.fields {
            let item = object.get(&field.name).ok_or_else(|| WireError::MissingField {
                class: class.name.clone(),
                field: field.name.clone(),
            })?;
            let value = if field.is_array {
                let items = item
                    .as_array()
                    .ok_or_else(|| mismatch(&field.name, "a JSON array"))?;
                let mut array = Vec::with_capacity(items.len());
                for item in items {
                    array.push(Value::single_from_json(schema, field, item)?);
                }
                Value::Array(array)
            } else {
                Value::single_from_json(schema, field, item)?
            };
            fields.insert(field.name.as_str(), value);
        }
        Ok(Value::Object(class.name.as_str(), fields))
    }

    fn single_from_json(
        schema: &'a Schema,
        field: &'a Field,
        json: &serde_json::Value,
    ) -> Result<Value<'a>, WireError> {
        let value = match &field.type_ {
            FieldType::Primitive(Primitive::Int) => json
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::Int),
            FieldType::Primitive(Primitive::Float)  => json.as_f64().map(Value::Float),
            FieldType::Primitive(Primitive::Bool)   => json.as_bool().map(Value::Bool),
            FieldType::Primitive(Primitive::String) => json.as_str().map(|s| Value::String(s.to_owned())),
            FieldType::Class(name) => {
                let class = lookup_class(schema, name)?;
                return Value::from_json(schema, class, json);
            }
        };
        value.ok_or_else(|| mismatch(&field.name, field.type_.name()))
    }
}

fn main_class(schema: &Schema) -> Result<&Class, WireError> {
    schema
        .main_class()
        .ok_or_else(|| WireError::UnknownClass(String::new()))
}

fn lookup_class<'s>(schema: &'s Schema, name: &str) -> Result<&'s Class, WireError> {
    schema
        .class(name)
        .ok_or_else(|| WireError::UnknownClass(name.to_owned()))
}

fn mismatch(field: &str, expected: &str) -> WireError {
    WireError::TypeMismatch {
        field:    field.to_owned(),
        expected: expected.to_owned(),
    }
}

impl<'a> Index<usize> for Value<'a> {
    type Output = Value<'a>;

    /// A convenience method that adds support for `self[index]` expressions.
    /// It will panic if this value isn't an [Array](#variant.Array) or if the
    /// provided index is out of bounds.
    fn index(&self, index: usize) -> &Value<'a> {
        match *self {
            Value::Array(ref values) => &values[index],
            _ => panic!(),
        }
    }
}

impl<'a> fmt::Debug for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            Value::Bool(value) => value.fmt(f),
            Value::Int(value) => value.fmt(f),
            Value::Float(value) => value.fmt(f),
            Value::String(ref value) => value.fmt(f),
            Value::Array(ref values) => values.fmt(f),

            Value::Object(name, ref fields) => {
                write!(f, "{} {{", name)?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl<'a> Serialize for Value<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => serializer.serialize_i32(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Object(_, fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
