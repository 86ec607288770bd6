//! JSON value → [`Record`].
//!
//! The walk is driven by the shape, not by the document: fields are visited
//! in declaration order, depth first, and the first failure aborts the whole
//! call. Nothing partial is ever handed back.
use serde_json::{Map, Number, Value};

use crate::codec::CodecOptions;
use crate::error::CodecError;
use crate::path::Path;
use crate::record::{FieldValue, Record};
use crate::registry::ShapeRegistry;
use crate::shape::{Field, Kind, Primitive, Shape};

pub struct Decoder<'r> {
    registry: &'r ShapeRegistry,
    options: CodecOptions,
}

/// Per-call cursor: where we are and how deep.
#[derive(Default)]
struct Walk {
    path: Path,
    depth: usize,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r ShapeRegistry, options: CodecOptions) -> Self {
        Self { registry, options }
    }

    pub fn decode(&self, value: &Value, shape: &str) -> Result<Record, CodecError> {
        let mut walk = Walk::default();
        let shape = self.registry.resolve(shape, &walk.path)?;
        self.record(value, shape, &mut walk)
    }

    fn record(&self, value: &Value, shape: &Shape, walk: &mut Walk) -> Result<Record, CodecError> {
        let Value::Object(map) = value else {
            let expected = Kind::record(shape.name());
            return Err(CodecError::type_mismatch(walk.path.clone(), expected, json_tag(value)));
        };
        walk.enter(self.options.max_depth)?;

        let mut record = Record::new(shape.name());
        for field in shape.fields() {
            walk.path.push(field.key.as_str());
            if let Some(value) = self.field(map, field, shape, walk)? {
                record.set(field.key.as_str(), value);
            }
            walk.path.pop();
        }

        if self.options.deny_unknown_keys {
            if let Some(key) = map.keys().find(|k| shape.field(k).is_none()) {
                let message = format!("key is not declared by `{}`", shape.name());
                return Err(CodecError::other(walk.path.join(key.as_str()), message));
            }
        }

        walk.leave();
        Ok(record)
    }

    /// `None` means the field is an absent optional.
    fn field(
        &self,
        map: &Map<String, Value>,
        field: &Field,
        shape: &Shape,
        walk: &mut Walk,
    ) -> Result<Option<FieldValue>, CodecError> {
        match map.get(&field.key) {
            None if field.required => Err(CodecError::key_not_found(walk.path.clone(), shape.name())),
            Some(Value::Null) if field.required => {
                Err(CodecError::value_not_found(walk.path.clone(), &field.kind))
            }
            None | Some(Value::Null) => Ok(None),
            Some(value) => self.value(value, &field.kind, walk).map(Some),
        }
    }

    fn value(&self, value: &Value, kind: &Kind, walk: &mut Walk) -> Result<FieldValue, CodecError> {
        if value.is_null() {
            // only sequence elements get here; fields filter null beforehand
            return Err(CodecError::value_not_found(walk.path.clone(), kind));
        }
        match kind {
            Kind::Primitive(primitive) => primitive_value(value, *primitive, &walk.path),
            Kind::Record(name) => {
                let shape = self.registry.resolve(name, &walk.path)?;
                self.record(value, shape, walk).map(FieldValue::Record)
            }
            Kind::Sequence(item) => {
                let Value::Array(xs) = value else {
                    return Err(CodecError::type_mismatch(walk.path.clone(), kind, json_tag(value)));
                };
                walk.enter(self.options.max_depth)?;
                let mut out = Vec::with_capacity(xs.len());
                for (i, x) in xs.iter().enumerate() {
                    walk.path.push(i);
                    out.push(self.value(x, item, walk)?);
                    walk.path.pop();
                }
                walk.leave();
                Ok(FieldValue::Sequence(out))
            }
        }
    }
}

impl Walk {
    fn enter(&mut self, max_depth: Option<usize>) -> Result<(), CodecError> {
        self.depth += 1;
        match max_depth {
            Some(max) if self.depth > max => Err(CodecError::other(
                self.path.clone(),
                format!("maximum nesting depth of {max} exceeded"),
            )),
            _ => Ok(()),
        }
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

fn primitive_value(value: &Value, primitive: Primitive, path: &Path) -> Result<FieldValue, CodecError> {
    match (primitive, value) {
        (Primitive::Bool, Value::Bool(b)) => Ok(FieldValue::Bool(*b)),
        (Primitive::String, Value::String(s)) => Ok(FieldValue::String(s.clone())),
        (Primitive::Integer, Value::Number(n)) => integer_of(n)
            .map(FieldValue::Integer)
            .ok_or_else(|| CodecError::type_mismatch(path.clone(), primitive, describe_number(n))),
        (Primitive::Number, Value::Number(n)) => n
            .as_f64()
            .map(FieldValue::from)
            .ok_or_else(|| CodecError::type_mismatch(path.clone(), primitive, describe_number(n))),
        _ => Err(CodecError::type_mismatch(path.clone(), primitive, json_tag(value))),
    }
}

/// Whole numbers written in float form (`30.0`, `1e2`) count as integers too.
fn integer_of(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    // 2^63 is exact in f64, unlike i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= -LIMIT && f < LIMIT).then(|| f as i64)
}

fn describe_number(n: &Number) -> String {
    format!("number {n}")
}

/// JSON type name of a value, as used in error messages.
pub fn json_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::path::PathSegment;
    use serde_json::json;

    fn registry() -> ShapeRegistry {
        ShapeRegistry::builder()
            .define(Shape::new("Address")
                .required("street", Kind::STRING)
                .required("city", Kind::STRING)
                .required("zipCode", Kind::STRING))
            .define(Shape::new("Person")
                .required("name", Kind::STRING)
                .optional("age", Kind::INTEGER)
                .optional("address", Kind::record("Address"))
                .optional("hobbies", Kind::sequence_of(Kind::STRING))
                .optional("scores", Kind::sequence_of(Kind::sequence_of(Kind::NUMBER))))
            .define(Shape::new("Node")
                .required("label", Kind::STRING)
                .optional("children", Kind::sequence_of(Kind::record("Node"))))
            .build()
            .unwrap()
    }

    fn decode(value: Value, shape: &str) -> Result<Record, CodecError> {
        let registry = registry();
        Decoder::new(&registry, CodecOptions::default()).decode(&value, shape)
    }

    fn decode_with(value: Value, shape: &str, options: CodecOptions) -> Result<Record, CodecError> {
        let registry = registry();
        Decoder::new(&registry, options).decode(&value, shape)
    }

    #[test]
    fn root_must_be_an_object() {
        let err = decode(json!(["John"]), "Person").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.path().is_root());
        assert_eq!(err.message(), "expected object `Person`, found array");
    }

    #[test]
    fn unknown_root_shape_is_other() {
        let err = decode(json!({}), "Animal").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn decodes_nested_records_and_sequences() {
        let record = decode(json!({
            "name": "John",
            "age": 30,
            "address": { "street": "123 Main St", "city": "New York", "zipCode": "10001" },
            "hobbies": ["reading", "coding"],
            "scores": [[1, 2.5], []]
        }), "Person").unwrap();

        assert_eq!(record.string("name").unwrap(), "John");
        assert_eq!(record.integer("age").unwrap(), 30);
        assert_eq!(record.record("address").unwrap().string("city").unwrap(), "New York");
        assert_eq!(record.sequence("hobbies").unwrap(), [FieldValue::from("reading"), FieldValue::from("coding")]);
        let scores = record.sequence("scores").unwrap();
        assert_eq!(scores[0], FieldValue::sequence([1.0, 2.5]));
        assert_eq!(scores[1], FieldValue::Sequence(vec![]));
    }

    #[test]
    fn missing_and_null_optionals_are_absent() {
        let a = decode(json!({ "name": "John", "age": null }), "Person").unwrap();
        let b = decode(json!({ "name": "John" }), "Person").unwrap();
        assert_eq!(a, b);
        assert!(!a.contains("age"));
    }

    #[test]
    fn integer_rejects_fractions_and_strings() {
        let err = decode(json!({ "name": "John", "age": 30.5 }), "Person").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "expected integer, found number 30.5");

        let err = decode(json!({ "name": "John", "age": "30" }), "Person").unwrap_err();
        assert_eq!(err.message(), "expected integer, found string");
    }

    #[test]
    fn integer_accepts_whole_floats_in_range() {
        let record = decode(json!({ "name": "John", "age": 30.0 }), "Person").unwrap();
        assert_eq!(record.integer("age").unwrap(), 30);
        let record = decode(json!({ "name": "John", "age": 1e2 }), "Person").unwrap();
        assert_eq!(record.integer("age").unwrap(), 100);

        let err = decode(json!({ "name": "John", "age": 1e300 }), "Person").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path().to_string(), "age");
        let err = decode(json!({ "name": "John", "age": 9.3e18 }), "Person").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn null_sequence_element_is_value_not_found() {
        let err = decode(json!({ "name": "John", "hobbies": ["reading", null] }), "Person").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueNotFound);
        assert_eq!(err.path().segments(), [PathSegment::key("hobbies"), PathSegment::Index(1)]);
    }

    #[test]
    fn sequence_field_must_be_an_array() {
        let err = decode(json!({ "name": "John", "hobbies": "reading" }), "Person").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "expected array of string, found string");
    }

    #[test]
    fn recursive_errors_compose_paths() {
        let err = decode(json!({
            "label": "root",
            "children": [{ "label": "a" }, { "label": "b", "children": [{ "label": 7 }] }]
        }), "Node").unwrap_err();
        assert_eq!(err.path().to_string(), "children[1].children[0].label");
    }

    #[test]
    fn depth_limit_is_enforced() {
        let doc = json!({ "label": "root", "children": [{ "label": "a", "children": [] }] });
        // Node(1) → children(2) → Node(3) → children(4)
        let options = CodecOptions { max_depth: Some(3), ..CodecOptions::default() };
        let err = decode_with(doc.clone(), "Node", options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.path().to_string(), "children[0].children");

        let options = CodecOptions { max_depth: Some(4), ..CodecOptions::default() };
        assert!(decode_with(doc, "Node", options).is_ok());
    }

    #[test]
    fn unknown_keys_are_ignored_unless_denied() {
        let doc = json!({ "name": "John", "nickname": "JJ" });
        assert!(decode(doc.clone(), "Person").is_ok());

        let options = CodecOptions { deny_unknown_keys: true, ..CodecOptions::default() };
        let err = decode_with(doc, "Person", options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.path().to_string(), "nickname");
    }
}
