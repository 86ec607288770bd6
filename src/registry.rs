//! Shape registry: one [`Shape`] per record type, frozen after `build`.
//!
//! The decoder and encoder both resolve record references through the same
//! registry, so a shape can never drift between the two directions. Shapes
//! may reference each other (and themselves); only the instances are finite.
use indexmap::IndexMap;

use crate::error::{CodecError, ShapeError};
use crate::model::Model;
use crate::path::Path;
use crate::shape::Shape;

#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    shapes: Vec<Shape>,
}

#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: IndexMap<String, Shape>,
}

impl RegistryBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn define(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn model<M: Model>(self) -> Self {
        self.define(M::shape())
    }

    pub fn extend(mut self, shapes: impl IntoIterator<Item = Shape>) -> Self {
        self.shapes.extend(shapes);
        self
    }

    pub fn build(self) -> Result<ShapeRegistry, ShapeError> {
        let mut shapes = IndexMap::with_capacity(self.shapes.len());
        for shape in self.shapes {
            if shape.name().is_empty() {
                return Err(ShapeError::EmptyName);
            }
            check_unique_keys(&shape)?;
            if shapes.contains_key(shape.name()) {
                return Err(ShapeError::DuplicateShape(shape.name().to_owned()));
            }
            shapes.insert(shape.name().to_owned(), shape);
        }

        // references are checked once everything is known, so order of
        // definition and cycles don't matter
        for shape in shapes.values() {
            for field in shape.fields() {
                if let Some(target) = field.kind.referenced_shape() {
                    if !shapes.contains_key(target) {
                        return Err(ShapeError::UnresolvedReference {
                            shape: shape.name().to_owned(),
                            key: field.key.clone(),
                            target: target.to_owned(),
                        });
                    }
                }
            }
        }

        Ok(ShapeRegistry { shapes })
    }
}

impl ShapeRegistry {
    pub fn builder() -> RegistryBuilder { RegistryBuilder::new() }

    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.shapes.get(name)
    }

    /// Look up `name`, failing with an `Other` error located at `path`.
    pub fn resolve(&self, name: &str, path: &Path) -> Result<&Shape, CodecError> {
        self.shapes
            .get(name)
            .ok_or_else(|| CodecError::other(path.clone(), format!("unknown shape `{name}`")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    /// Shapes in definition order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn len(&self) -> usize { self.shapes.len() }

    pub fn is_empty(&self) -> bool { self.shapes.is_empty() }
}

fn check_unique_keys(shape: &Shape) -> Result<(), ShapeError> {
    let fields = shape.fields();
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.key == field.key) {
            return Err(ShapeError::DuplicateKey {
                shape: shape.name().to_owned(),
                key: field.key.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Kind;

    fn address() -> Shape {
        Shape::new("Address")
            .required("street", Kind::STRING)
            .required("city", Kind::STRING)
    }

    #[test]
    fn references_may_be_defined_later() {
        let registry = ShapeRegistry::builder()
            .define(Shape::new("Person").required("address", Kind::record("Address")))
            .define(address())
            .build()
            .unwrap();
        assert_eq!(registry.len(), 2);
        let names = registry.shapes().map(Shape::name).collect::<Vec<_>>();
        assert_eq!(names, ["Person", "Address"]);
    }

    #[test]
    fn self_reference_is_allowed() {
        let node = Shape::new("Node")
            .required("label", Kind::STRING)
            .optional("children", Kind::sequence_of(Kind::record("Node")));
        assert!(ShapeRegistry::builder().define(node).build().is_ok());
    }

    #[test]
    fn rejects_dangling_reference() {
        let err = ShapeRegistry::builder()
            .define(Shape::new("Person").required("hobbies", Kind::sequence_of(Kind::record("Hobby"))))
            .build()
            .unwrap_err();
        assert_eq!(err, ShapeError::UnresolvedReference {
            shape: "Person".into(),
            key: "hobbies".into(),
            target: "Hobby".into(),
        });
    }

    #[test]
    fn rejects_duplicate_keys_and_shapes() {
        let dup_key = Shape::new("Address")
            .required("city", Kind::STRING)
            .optional("city", Kind::STRING);
        assert!(matches!(
            ShapeRegistry::builder().define(dup_key).build(),
            Err(ShapeError::DuplicateKey { .. })
        ));

        assert_eq!(
            ShapeRegistry::builder().define(address()).define(address()).build().unwrap_err(),
            ShapeError::DuplicateShape("Address".into())
        );
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShapeRegistry>();
    }
}
