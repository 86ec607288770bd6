//! Front API: a registry plus options, decoding and encoding by shape name.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::CodecError;
use crate::model::Model;
use crate::path::Path;
use crate::record::Record;
use crate::registry::ShapeRegistry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Cap on nested records plus sequences, root record counted as 1.
    /// `None` leaves nesting unbounded.
    pub max_depth: Option<usize>,
    /// Fail on object keys the shape does not declare.
    pub deny_unknown_keys: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r ShapeRegistry,
    options: CodecOptions,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r ShapeRegistry) -> Self {
        Self { registry, options: CodecOptions::default() }
    }

    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &'r ShapeRegistry { self.registry }

    pub fn options(&self) -> CodecOptions { self.options }

    pub fn decode(&self, value: &Value, shape: &str) -> Result<Record, CodecError> {
        Decoder::new(self.registry, self.options).decode(value, shape)
    }

    /// Parse `bytes` as JSON, then decode. Syntax errors surface as `Other`.
    pub fn from_slice(&self, bytes: &[u8], shape: &str) -> Result<Record, CodecError> {
        let value = serde_json::from_slice::<Value>(bytes)
            .map_err(|e| CodecError::other(Path::root(), format!("invalid JSON: {e}")))?;
        self.decode(&value, shape)
    }

    /// Encode against the record's own shape.
    pub fn encode(&self, record: &Record) -> Result<Value, CodecError> {
        self.encode_as(record, record.shape())
    }

    pub fn encode_as(&self, record: &Record, shape: &str) -> Result<Value, CodecError> {
        Encoder::new(self.registry).encode(record, shape)
    }

    pub fn to_string(&self, record: &Record) -> Result<String, CodecError> {
        let value = self.encode(record)?;
        Ok(value.to_string())
    }

    pub fn to_string_pretty(&self, record: &Record) -> Result<String, CodecError> {
        let value = self.encode(record)?;
        serde_json::to_string_pretty(&value)
            .map_err(|e| CodecError::other(Path::root(), e.to_string()))
    }

    pub fn decode_model<M: Model>(&self, value: &Value) -> Result<M, CodecError> {
        let record = self.decode(value, &M::shape_name())?;
        M::from_record(&record)
    }

    pub fn encode_model<M: Model>(&self, model: &M) -> Result<Value, CodecError> {
        self.encode(&model.to_record())
    }
}
