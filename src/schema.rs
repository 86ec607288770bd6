//! JSON Schema view of registered shapes.
//!
//! Every shape reachable from the root becomes one entry under `$defs`;
//! record references turn into `$ref`s, so recursive shapes stay finite.
use std::collections::BTreeSet;
use serde_json::{json, Map, Value};

use crate::error::CodecError;
use crate::path::Path;
use crate::registry::ShapeRegistry;
use crate::shape::{Kind, Primitive, Shape};

/// `{"$ref": "#/$defs/<root>", "$defs": {...}}` for `root` and its dependencies.
pub fn json_schema(registry: &ShapeRegistry, root: &str) -> Result<Value, CodecError> {
    let mut defs = Map::new();
    let mut seen = BTreeSet::new();
    let mut pending = vec![root.to_owned()];

    while let Some(name) = pending.pop() {
        if !seen.insert(name.clone()) {
            continue;
        }
        let shape = registry.resolve(&name, &Path::root())?;
        for field in shape.fields() {
            if let Some(target) = field.kind.referenced_shape() {
                pending.push(target.to_owned());
            }
        }
        defs.insert(name, schema_from_shape(shape));
    }

    // the walk visits shapes in stack order; pin $defs to registry order
    let mut ordered = Map::new();
    for shape in registry.shapes() {
        if let Some(def) = defs.remove(shape.name()) {
            ordered.insert(shape.name().to_owned(), def);
        }
    }

    Ok(json!({
        "$ref": def_ref(root),
        "$defs": Value::Object(ordered),
    }))
}

pub fn schema_from_shape(shape: &Shape) -> Value {
    fn obj_of(props: Vec<(String, Value)>, required: Vec<String>) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::from("object"));
        let mut props_map = Map::new();
        for (k, v) in props {
            props_map.insert(k, v);
        }
        map.insert("properties".into(), Value::Object(props_map));
        if !required.is_empty() {
            map.insert(
                "required".into(),
                Value::Array(required.into_iter().map(Value::from).collect()),
            );
        }
        Value::Object(map)
    }

    let props = shape.fields().iter()
        .map(|f| (f.key.clone(), schema_from_kind(&f.kind)))
        .collect::<Vec<_>>();
    let req = shape.fields().iter()
        .filter(|f| f.required)
        .map(|f| f.key.clone())
        .collect::<Vec<_>>();
    obj_of(props, req)
}

pub fn schema_from_kind(kind: &Kind) -> Value {
    match kind {
        Kind::Primitive(Primitive::Bool) => json!({ "type": "boolean" }),
        Kind::Primitive(Primitive::Integer) => json!({ "type": "integer" }),
        Kind::Primitive(Primitive::Number) => json!({ "type": "number" }),
        Kind::Primitive(Primitive::String) => json!({ "type": "string" }),
        Kind::Record(name) => json!({ "$ref": def_ref(name) }),
        Kind::Sequence(item) => json!({
            "type": "array",
            "items": schema_from_kind(item),
        }),
    }
}

fn def_ref(name: &str) -> String {
    format!("#/$defs/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::builtin_registry;

    #[test]
    fn person_schema_pulls_in_address_only() {
        let schema = json_schema(builtin_registry().unwrap(), "Person").unwrap();
        assert_eq!(schema["$ref"], "#/$defs/Person");
        let defs = schema["$defs"].as_object().unwrap();
        assert_eq!(defs.keys().collect::<Vec<_>>(), ["Address", "Person"]);

        let person = &defs["Person"];
        assert_eq!(person["properties"]["address"], json!({ "$ref": "#/$defs/Address" }));
        assert_eq!(person["properties"]["hobbies"], json!({ "type": "array", "items": { "type": "string" } }));
        assert_eq!(person["required"], json!(["name", "age", "isStudent", "address", "hobbies"]));
    }

    #[test]
    fn optional_only_shape_has_no_required_list() {
        let shape = Shape::new("Tag").optional("label", Kind::STRING);
        let schema = schema_from_shape(&shape);
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn recursive_shapes_terminate() {
        let registry = ShapeRegistry::builder()
            .define(Shape::new("Node").optional("children", Kind::sequence_of(Kind::record("Node"))))
            .build()
            .unwrap();
        let schema = json_schema(&registry, "Node").unwrap();
        assert_eq!(schema["$defs"]["Node"]["properties"]["children"]["items"]["$ref"], "#/$defs/Node");
    }
}
