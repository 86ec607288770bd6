//! Locations inside a JSON document.
//!
//! A [`Path`] is the chain of object keys and array indices walked from the
//! document root down to some node. Errors carry one so a caller can point at
//! the offending key without re-parsing the input.
use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self { Self::Key(key.to_owned()) }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self { Self::Key(key) }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self { Self::Index(index) }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self { Self::default() }

    pub fn segments(&self) -> &[PathSegment] { &self.0 }

    pub fn is_root(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub(crate) fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// Copy of this path with one more segment on the end.
    pub fn join(&self, segment: impl Into<PathSegment>) -> Self {
        let mut out = self.clone();
        out.push(segment);
        out
    }

    pub(crate) fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) if !is_bare(key) => write!(f, "[{key:?}]")?,
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
            }
        }
        Ok(())
    }
}

/// Keys that can be written without quotes and still read back unambiguously.
fn is_bare(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('<')
        && !key.chars().any(|c| matches!(c, '.' | '[' | ']' | '"') || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_keys_and_indices() {
        let path: Path = [PathSegment::key("hobbies"), PathSegment::Index(1)].into_iter().collect();
        assert_eq!(path.to_string(), "hobbies[1]");

        let nested = Path::root().join("address").join("street");
        assert_eq!(nested.to_string(), "address.street");
        assert_eq!(Path::root().to_string(), "<root>");
    }

    #[test]
    fn awkward_keys_are_quoted() {
        let dotted = Path::root().join("a.b");
        let nested = Path::root().join("a").join("b");
        assert_eq!(dotted.to_string(), r#"["a.b"]"#);
        assert_eq!(nested.to_string(), "a.b");

        assert_eq!(Path::root().join("").to_string(), r#"[""]"#);
        assert_eq!(Path::root().join("tags").join("x[0]").to_string(), r#"tags["x[0]"]"#);
        assert_eq!(Path::root().join("items").join(2usize).join("first name").to_string(), r#"items[2]["first name"]"#);
    }

    #[test]
    fn segments_serialize_as_plain_json() {
        let path = Path::root().join("hobbies").join(1usize);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["hobbies", 1]));
        let back: Path = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
    }
}
