// Static description of record types. No serde_json::Value here.
use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Bool,
    Integer,                 // fits i64
    Number,                  // any JSON number, held as f64
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "KindRepr", into = "KindRepr")]
pub enum Kind {
    Primitive(Primitive),
    Record(String),          // resolved by name through the registry
    Sequence(Box<Kind>),     // order preserved
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    #[serde(default = "required_by_default")]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    name: String,
    fields: Vec<Field>,      // declaration order drives decode and encode
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Kind {
    pub const BOOL: Kind = Kind::Primitive(Primitive::Bool);
    pub const INTEGER: Kind = Kind::Primitive(Primitive::Integer);
    pub const NUMBER: Kind = Kind::Primitive(Primitive::Number);
    pub const STRING: Kind = Kind::Primitive(Primitive::String);

    pub fn record(shape: impl Into<String>) -> Self {
        Kind::Record(shape.into())
    }

    pub fn sequence_of(item: Kind) -> Self {
        Kind::Sequence(Box::new(item))
    }

    /// The shape this kind refers to, looking through any sequences.
    pub fn referenced_shape(&self) -> Option<&str> {
        match self {
            Kind::Primitive(_) => None,
            Kind::Record(name) => Some(name),
            Kind::Sequence(item) => item.referenced_shape(),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Primitive::Bool => "bool",
            Primitive::Integer => "integer",
            Primitive::Number => "number",
            Primitive::String => "string",
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Primitive(p) => p.fmt(f),
            Kind::Record(name) => write!(f, "object `{name}`"),
            Kind::Sequence(item) => write!(f, "array of {item}"),
        }
    }
}

impl Field {
    pub fn required(key: impl Into<String>, kind: Kind) -> Self {
        Self { key: key.into(), kind, required: true }
    }

    pub fn optional(key: impl Into<String>, kind: Kind) -> Self {
        Self { key: key.into(), kind, required: false }
    }
}

impl Shape {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }

    pub fn required(mut self, key: impl Into<String>, kind: Kind) -> Self {
        self.fields.push(Field::required(key, kind));
        self
    }

    pub fn optional(mut self, key: impl Into<String>, kind: Kind) -> Self {
        self.fields.push(Field::optional(key, kind));
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn fields(&self) -> &[Field] { &self.fields }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SERDE REPRESENTATION
// ————————————————————————————————————————————————————————————————————————————

/// `"string"`, `{"record": "Address"}`, `{"sequence": "string"}`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindRepr {
    Bool,
    Integer,
    Number,
    String,
    Record(String),
    Sequence(Box<KindRepr>),
}

impl From<KindRepr> for Kind {
    fn from(repr: KindRepr) -> Self {
        match repr {
            KindRepr::Bool => Kind::BOOL,
            KindRepr::Integer => Kind::INTEGER,
            KindRepr::Number => Kind::NUMBER,
            KindRepr::String => Kind::STRING,
            KindRepr::Record(name) => Kind::Record(name),
            KindRepr::Sequence(item) => Kind::Sequence(Box::new(Kind::from(*item))),
        }
    }
}

impl From<Kind> for KindRepr {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Primitive(Primitive::Bool) => KindRepr::Bool,
            Kind::Primitive(Primitive::Integer) => KindRepr::Integer,
            Kind::Primitive(Primitive::Number) => KindRepr::Number,
            Kind::Primitive(Primitive::String) => KindRepr::String,
            Kind::Record(name) => KindRepr::Record(name),
            Kind::Sequence(item) => KindRepr::Sequence(Box::new(KindRepr::from(*item))),
        }
    }
}

fn required_by_default() -> bool { true }
