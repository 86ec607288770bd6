use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::{Path, PathSegment};

/// Why a value could not be mapped to (or from) its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required key is missing from the object.
    KeyNotFound,
    /// A required key is present but holds `null`.
    ValueNotFound,
    /// A value has the wrong JSON type for its field.
    TypeMismatch,
    /// Depth limit, unknown keys, unknown shapes, malformed input.
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::KeyNotFound => "key not found",
            ErrorKind::ValueNotFound => "value not found",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::Other => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {path}: {message}")]
pub struct CodecError {
    kind: ErrorKind,
    path: Path,
    message: String,
}

impl CodecError {
    pub fn new(kind: ErrorKind, path: Path, message: impl Into<String>) -> Self {
        Self { kind, path, message: message.into() }
    }

    pub(crate) fn key_not_found(path: Path, shape: &str) -> Self {
        let message = format!("required key missing from `{shape}`");
        Self::new(ErrorKind::KeyNotFound, path, message)
    }

    pub(crate) fn value_not_found(path: Path, expected: impl fmt::Display) -> Self {
        let message = format!("expected {expected}, found null");
        Self::new(ErrorKind::ValueNotFound, path, message)
    }

    pub(crate) fn type_mismatch(path: Path, expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        let message = format!("expected {expected}, found {found}");
        Self::new(ErrorKind::TypeMismatch, path, message)
    }

    pub(crate) fn other(path: Path, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Other, path, message)
    }

    pub fn kind(&self) -> ErrorKind { self.kind }

    pub fn path(&self) -> &Path { &self.path }

    pub fn message(&self) -> &str { &self.message }

    /// Re-root this error under `segment`, for errors raised by a nested
    /// model that only knows paths relative to itself.
    pub fn within(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.prepend(segment.into());
        self
    }
}

/// A shape declaration that cannot be turned into a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape name must not be empty")]
    EmptyName,
    #[error("shape `{0}` is defined more than once")]
    DuplicateShape(String),
    #[error("shape `{shape}` declares key `{key}` more than once")]
    DuplicateKey { shape: String, key: String },
    #[error("shape `{shape}` field `{key}` refers to undefined shape `{target}`")]
    UnresolvedReference { shape: String, key: String, target: String },
    #[error("invalid shape file at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("cannot read shape file {file}: {message}")]
    Io { file: String, message: String },
}
