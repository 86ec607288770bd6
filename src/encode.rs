//! [`Record`] → JSON value.
//!
//! Keys are written in shape declaration order and absent optionals are left
//! out entirely, which makes the output canonical. Records are built by
//! callers, so the walk also checks each value against its field kind and
//! fails with the same error taxonomy as decoding instead of emitting JSON
//! that would not decode again.
use serde_json::{Map, Number, Value};

use crate::error::CodecError;
use crate::path::Path;
use crate::record::{FieldValue, Record};
use crate::registry::ShapeRegistry;
use crate::shape::{Kind, Primitive, Shape};

pub struct Encoder<'r> {
    registry: &'r ShapeRegistry,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r ShapeRegistry) -> Self {
        Self { registry }
    }

    pub fn encode(&self, record: &Record, shape: &str) -> Result<Value, CodecError> {
        let mut path = Path::root();
        let shape = self.registry.resolve(shape, &path)?;
        self.record(record, shape, &mut path)
    }

    fn record(&self, record: &Record, shape: &Shape, path: &mut Path) -> Result<Value, CodecError> {
        if record.shape() != shape.name() {
            let found = format!("object `{}`", record.shape());
            return Err(CodecError::type_mismatch(path.clone(), Kind::record(shape.name()), found));
        }

        let mut map = Map::with_capacity(shape.fields().len());
        for field in shape.fields() {
            path.push(field.key.as_str());
            match record.get(&field.key).filter(|v| !v.is_absent()) {
                None if field.required => {
                    return Err(CodecError::key_not_found(path.clone(), shape.name()));
                }
                None => {}
                Some(value) => {
                    map.insert(field.key.clone(), self.value(value, &field.kind, path)?);
                }
            }
            path.pop();
        }
        Ok(Value::Object(map))
    }

    fn value(&self, value: &FieldValue, kind: &Kind, path: &mut Path) -> Result<Value, CodecError> {
        match (kind, value) {
            (_, FieldValue::Absent) => Err(CodecError::value_not_found(path.clone(), kind)),
            (Kind::Primitive(Primitive::Bool), FieldValue::Bool(b)) => Ok(Value::Bool(*b)),
            (Kind::Primitive(Primitive::Integer), FieldValue::Integer(i)) => Ok(Value::from(*i)),
            (Kind::Primitive(Primitive::Number), FieldValue::Number(n)) => Number::from_f64(n.0)
                .map(Value::Number)
                .ok_or_else(|| CodecError::other(path.clone(), format!("{n} has no JSON representation"))),
            (Kind::Primitive(Primitive::String), FieldValue::String(s)) => Ok(Value::String(s.clone())),
            (Kind::Record(name), FieldValue::Record(record)) => {
                let shape = self.registry.resolve(name, path)?;
                self.record(record, shape, path)
            }
            (Kind::Sequence(item), FieldValue::Sequence(xs)) => {
                let mut out = Vec::with_capacity(xs.len());
                for (i, x) in xs.iter().enumerate() {
                    path.push(i);
                    out.push(self.value(x, item, path)?);
                    path.pop();
                }
                Ok(Value::Array(out))
            }
            _ => Err(CodecError::type_mismatch(path.clone(), kind, value.type_name())),
        }
    }
}
