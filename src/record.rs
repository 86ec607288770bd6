//! In-memory record instances.
//!
//! A [`Record`] is what the decoder produces and the encoder consumes: the
//! name of its shape plus the values of the fields that are present. Absent
//! optionals are simply not stored, so two records holding the same data
//! always compare equal.
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::error::CodecError;
use crate::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Absent,
    Bool(bool),
    Integer(i64),
    Number(OrderedFloat<f64>),
    String(String),
    Record(Record),
    Sequence(Vec<FieldValue>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    shape: String,
    fields: IndexMap<String, FieldValue>,
}

impl FieldValue {
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        FieldValue::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn is_absent(&self) -> bool { matches!(self, FieldValue::Absent) }

    pub fn as_bool(&self) -> Option<bool> {
        match self { FieldValue::Bool(b) => Some(*b), _ => None }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self { FieldValue::Integer(i) => Some(*i), _ => None }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self { FieldValue::Number(n) => Some(n.0), _ => None }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self { FieldValue::String(s) => Some(s), _ => None }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self { FieldValue::Record(r) => Some(r), _ => None }
    }

    pub fn as_sequence(&self) -> Option<&[FieldValue]> {
        match self { FieldValue::Sequence(xs) => Some(xs), _ => None }
    }

    /// Short description used in mismatch messages.
    pub fn type_name(&self) -> String {
        match self {
            FieldValue::Absent => "nothing".into(),
            FieldValue::Bool(_) => "bool".into(),
            FieldValue::Integer(_) => "integer".into(),
            FieldValue::Number(_) => "number".into(),
            FieldValue::String(_) => "string".into(),
            FieldValue::Record(r) => format!("object `{}`", r.shape),
            FieldValue::Sequence(_) => "array".into(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self { FieldValue::Bool(b) }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self { FieldValue::Integer(i) }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self { FieldValue::Number(OrderedFloat(n)) }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self { FieldValue::String(s.to_owned()) }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self { FieldValue::String(s) }
}

impl From<Record> for FieldValue {
    fn from(r: Record) -> Self { FieldValue::Record(r) }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(xs: Vec<FieldValue>) -> Self { FieldValue::Sequence(xs) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Absent, Into::into)
    }
}

impl Record {
    pub fn new(shape: impl Into<String>) -> Self {
        Self { shape: shape.into(), fields: IndexMap::new() }
    }

    pub fn shape(&self) -> &str { &self.shape }

    /// Set `key`; setting [`FieldValue::Absent`] removes it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        match value.into() {
            FieldValue::Absent => { self.fields.shift_remove(&key); }
            value => { self.fields.insert(key, value); }
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Present fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    // ---- typed accessors (paths are relative to this record) ----

    pub fn bool(&self, key: &str) -> Result<bool, CodecError> {
        self.require(key, "bool", FieldValue::as_bool)
    }

    pub fn integer(&self, key: &str) -> Result<i64, CodecError> {
        self.require(key, "integer", FieldValue::as_i64)
    }

    pub fn number(&self, key: &str) -> Result<f64, CodecError> {
        self.require(key, "number", FieldValue::as_f64)
    }

    pub fn string(&self, key: &str) -> Result<&str, CodecError> {
        self.require(key, "string", FieldValue::as_str)
    }

    pub fn record(&self, key: &str) -> Result<&Record, CodecError> {
        self.require(key, "object", FieldValue::as_record)
    }

    pub fn sequence(&self, key: &str) -> Result<&[FieldValue], CodecError> {
        self.require(key, "array", FieldValue::as_sequence)
    }

    pub fn opt_bool(&self, key: &str) -> Result<Option<bool>, CodecError> {
        self.optional(key, "bool", FieldValue::as_bool)
    }

    pub fn opt_integer(&self, key: &str) -> Result<Option<i64>, CodecError> {
        self.optional(key, "integer", FieldValue::as_i64)
    }

    pub fn opt_string(&self, key: &str) -> Result<Option<&str>, CodecError> {
        self.optional(key, "string", FieldValue::as_str)
    }

    pub fn opt_record(&self, key: &str) -> Result<Option<&Record>, CodecError> {
        self.optional(key, "object", FieldValue::as_record)
    }

    fn require<'a, T>(
        &'a self,
        key: &str,
        expected: &str,
        pick: impl FnOnce(&'a FieldValue) -> Option<T>,
    ) -> Result<T, CodecError> {
        self.optional(key, expected, pick)?
            .ok_or_else(|| CodecError::key_not_found(Path::root().join(key), &self.shape))
    }

    fn optional<'a, T>(
        &'a self,
        key: &str,
        expected: &str,
        pick: impl FnOnce(&'a FieldValue) -> Option<T>,
    ) -> Result<Option<T>, CodecError> {
        let Some(value) = self.fields.get(key) else {
            return Ok(None);
        };
        pick(value)
            .map(Some)
            .ok_or_else(|| CodecError::type_mismatch(Path::root().join(key), expected, value.type_name()))
    }
}

/// Decode each element of a sequence, re-rooting element errors at their index.
pub fn collect_sequence<'a, T>(
    items: &'a [FieldValue],
    mut each: impl FnMut(&'a FieldValue) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| each(item).map_err(|e| e.within(i)))
        .collect()
}
