//! Typed JSON codec driven by explicit shapes.
//!
//! A [`Shape`] lists a record type's keys, whether each is required, and what
//! it holds: a primitive, another record, or a sequence. Shapes live in an
//! immutable [`ShapeRegistry`] that the decoder and encoder share.
//!
//! - decode: `serde_json::Value` → [`Record`], or a [`CodecError`] naming the
//!   exact key/index that failed and why.
//! - encode: [`Record`] → `serde_json::Value`, keys in declaration order,
//!   absent optionals omitted.
//!
//! ```
//! use json_shape::{Codec, ErrorKind, Kind, Shape, ShapeRegistry};
//! use serde_json::json;
//!
//! let registry = ShapeRegistry::builder()
//!     .define(Shape::new("Person")
//!         .required("name", Kind::STRING)
//!         .optional("age", Kind::INTEGER)
//!         .required("hobbies", Kind::sequence_of(Kind::STRING)))
//!     .build()?;
//! let codec = Codec::new(&registry);
//!
//! let person = codec.decode(&json!({ "name": "John", "hobbies": ["reading"] }), "Person")?;
//! assert_eq!(codec.to_string(&person)?, r#"{"name":"John","hobbies":["reading"]}"#);
//!
//! let err = codec.decode(&json!({ "name": "John", "hobbies": ["reading", 5] }), "Person").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TypeMismatch);
//! assert_eq!(err.path().to_string(), "hobbies[1]");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod codec;
pub mod decode;
pub mod encode;
pub mod error;
pub mod model;
pub mod models;
pub mod path;
pub mod record;
pub mod registry;
pub mod schema;
pub mod shape;
pub mod shape_file;

pub use codec::{Codec, CodecOptions};
pub use error::{CodecError, ErrorKind, ShapeError};
pub use model::Model;
pub use path::{Path, PathSegment};
pub use record::{FieldValue, Record};
pub use registry::{RegistryBuilder, ShapeRegistry};
pub use shape::{Field, Kind, Primitive, Shape};
pub use shape_file::ShapeFile;
