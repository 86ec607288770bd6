//! Built-in record types and the process-wide registry that holds them.
use once_cell::sync::OnceCell;

use crate::error::{CodecError, ShapeError};
use crate::model::Model;
use crate::path::Path;
use crate::record::{collect_sequence, FieldValue, Record};
use crate::registry::ShapeRegistry;
use crate::shape::{Kind, Shape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub age: i64,
    pub is_student: bool,
    pub address: Address,
    pub hobbies: Vec<String>,
}

/// A stored user profile; only `id` and `name` are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub age: Option<i64>,
    pub is_student: Option<bool>,
}

impl Model for Address {
    fn shape() -> Shape {
        Shape::new("Address")
            .required("street", Kind::STRING)
            .required("city", Kind::STRING)
            .required("zipCode", Kind::STRING)
    }

    fn to_record(&self) -> Record {
        Record::new("Address")
            .with("street", self.street.as_str())
            .with("city", self.city.as_str())
            .with("zipCode", self.zip_code.as_str())
    }

    fn from_record(record: &Record) -> Result<Self, CodecError> {
        Ok(Self {
            street: record.string("street")?.to_owned(),
            city: record.string("city")?.to_owned(),
            zip_code: record.string("zipCode")?.to_owned(),
        })
    }
}

impl Model for Person {
    fn shape() -> Shape {
        Shape::new("Person")
            .required("name", Kind::STRING)
            .required("age", Kind::INTEGER)
            .required("isStudent", Kind::BOOL)
            .required("address", Kind::record("Address"))
            .required("hobbies", Kind::sequence_of(Kind::STRING))
    }

    fn to_record(&self) -> Record {
        Record::new("Person")
            .with("name", self.name.as_str())
            .with("age", self.age)
            .with("isStudent", self.is_student)
            .with("address", self.address.to_record())
            .with("hobbies", FieldValue::sequence(self.hobbies.iter().map(String::as_str)))
    }

    fn from_record(record: &Record) -> Result<Self, CodecError> {
        Ok(Self {
            name: record.string("name")?.to_owned(),
            age: record.integer("age")?,
            is_student: record.bool("isStudent")?,
            address: Address::from_record(record.record("address")?).map_err(|e| e.within("address"))?,
            hobbies: collect_sequence(record.sequence("hobbies")?, |item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| CodecError::type_mismatch(Path::root(), "string", item.type_name()))
            })
            .map_err(|e| e.within("hobbies"))?,
        })
    }
}

impl Model for Profile {
    fn shape() -> Shape {
        Shape::new("Profile")
            .required("id", Kind::STRING)
            .required("name", Kind::STRING)
            .optional("age", Kind::INTEGER)
            .optional("isStudent", Kind::BOOL)
    }

    fn to_record(&self) -> Record {
        Record::new("Profile")
            .with("id", self.id.as_str())
            .with("name", self.name.as_str())
            .with("age", self.age)
            .with("isStudent", self.is_student)
    }

    fn from_record(record: &Record) -> Result<Self, CodecError> {
        Ok(Self {
            id: record.string("id")?.to_owned(),
            name: record.string("name")?.to_owned(),
            age: record.opt_integer("age")?,
            is_student: record.opt_bool("isStudent")?,
        })
    }
}

/// Registry holding every built-in model, built on first use.
pub fn builtin_registry() -> Result<&'static ShapeRegistry, ShapeError> {
    static REGISTRY: OnceCell<ShapeRegistry> = OnceCell::new();
    REGISTRY.get_or_try_init(|| {
        ShapeRegistry::builder()
            .model::<Address>()
            .model::<Person>()
            .model::<Profile>()
            .build()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn john() -> Person {
        Person {
            name: "John Doe".into(),
            age: 30,
            is_student: true,
            address: Address {
                street: "123 Main St".into(),
                city: "Some City".into(),
                zip_code: "12345".into(),
            },
            hobbies: vec!["Reading".into(), "Coding".into()],
        }
    }

    #[test]
    fn person_round_trips_through_json() {
        let codec = Codec::new(builtin_registry().unwrap());
        let value = codec.encode_model(&john()).unwrap();
        assert_eq!(value, json!({
            "name": "John Doe",
            "age": 30,
            "isStudent": true,
            "address": { "street": "123 Main St", "city": "Some City", "zipCode": "12345" },
            "hobbies": ["Reading", "Coding"]
        }));
        assert_eq!(codec.decode_model::<Person>(&value).unwrap(), john());
    }

    #[test]
    fn sample_without_zip_code_reports_nested_key() {
        let codec = Codec::new(builtin_registry().unwrap());
        let err = codec.decode_model::<Person>(&json!({
            "name": "John",
            "age": 30,
            "isStudent": false,
            "address": { "street": "123 Main St", "city": "New York" },
            "hobbies": ["reading", "coding", "gaming"]
        })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
        assert_eq!(err.path().to_string(), "address.zipCode");
    }

    #[test]
    fn profile_optionals_are_omitted() {
        let codec = Codec::new(builtin_registry().unwrap());
        let profile = Profile { id: "p-1".into(), name: "John".into(), age: None, is_student: Some(false) };
        let value = codec.encode_model(&profile).unwrap();
        assert_eq!(value, json!({ "id": "p-1", "name": "John", "isStudent": false }));
        assert_eq!(codec.decode_model::<Profile>(&value).unwrap(), profile);
    }

    #[test]
    fn from_record_re_roots_nested_errors() {
        let record = john().to_record().with("address", Record::new("Address").with("street", "x"));
        let err = Person::from_record(&record).unwrap_err();
        assert_eq!(err.path().to_string(), "address.city");
    }

    #[test]
    fn from_record_reports_fields_in_declaration_order() {
        let record = Record::new("Person")
            .with("age", "thirty")
            .with("address", Record::new("Address"))
            .with("hobbies", FieldValue::sequence([FieldValue::from(1i64)]));
        let err = Person::from_record(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
        assert_eq!(err.path().to_string(), "name");

        let err = Person::from_record(&record.with("name", "John")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path().to_string(), "age");
    }
}
