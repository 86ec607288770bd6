//! Shape declarations stored as JSON.
//!
//! ```json
//! {
//!   "shapes": [
//!     { "name": "Address", "fields": [{ "key": "city", "type": "string" }] },
//!     { "name": "Person", "fields": [
//!         { "key": "address", "type": { "record": "Address" }, "required": false },
//!         { "key": "hobbies", "type": { "sequence": "string" } }
//!     ] }
//!   ],
//!   "options": { "max_depth": 32 }
//! }
//! ```
use std::path::Path;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec::CodecOptions;
use crate::error::ShapeError;
use crate::registry::ShapeRegistry;
use crate::shape::Shape;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeFile {
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub options: CodecOptions,
}

impl ShapeFile {
    pub fn from_str(src: &str) -> Result<Self, ShapeError> {
        from_str_with_path(src)
    }

    pub fn load(path: &Path) -> Result<Self, ShapeError> {
        let bytes = std::fs::read(path).map_err(|error| ShapeError::Io {
            file: path.display().to_string(),
            message: error.to_string(),
        })?;
        from_slice_with_path(&bytes)
    }

    pub fn from_registry(registry: &ShapeRegistry, options: CodecOptions) -> Self {
        Self { shapes: registry.shapes().cloned().collect(), options }
    }

    pub fn into_registry(self) -> Result<(ShapeRegistry, CodecOptions), ShapeError> {
        let registry = ShapeRegistry::builder().extend(self.shapes).build()?;
        Ok((registry, self.options))
    }
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, ShapeError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_shape_error)
}

fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ShapeError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_shape_error)
}

fn into_shape_error(err: serde_path_to_error::Error<serde_json::Error>) -> ShapeError {
    let path = err.path().to_string();
    ShapeError::Parse { path, message: err.into_inner().to_string() }
}
