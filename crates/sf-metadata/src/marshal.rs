//! Schema-directed conversion of application objects into wire records.

use base64::{engine::general_purpose, Engine as _};
use busbar_sf_soap::{Fields, TypedVariant, Value, METADATA_NAMESPACE};

use crate::schema::TypeSchemaRegistry;

/// Field name that is always kept, declared or not.
pub const ID_FIELD: &str = "Id";

/// An application object that can be marshalled into a metadata record.
///
/// Implementations yield their own fields in a stable order. Only the
/// fields the target type declares (plus `Id`) survive marshalling.
pub trait MetadataObject {
    fn fields(&self) -> Vec<(String, Value)>;
}

impl MetadataObject for Fields {
    fn fields(&self) -> Vec<(String, Value)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl MetadataObject for Vec<(String, Value)> {
    fn fields(&self) -> Vec<(String, Value)> {
        self.clone()
    }
}

impl MetadataObject for serde_json::Map<String, serde_json::Value> {
    fn fields(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())))
            .collect()
    }
}

/// Only JSON objects have fields; any other JSON value yields none.
impl MetadataObject for serde_json::Value {
    fn fields(&self) -> Vec<(String, Value)> {
        match self {
            serde_json::Value::Object(map) => map.fields(),
            _ => Vec::new(),
        }
    }
}

impl<O: MetadataObject + ?Sized> MetadataObject for &O {
    fn fields(&self) -> Vec<(String, Value)> {
        (**self).fields()
    }
}

/// A converted record of one metadata type.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub type_name: String,
    pub fields: Fields,
}

impl MetadataRecord {
    /// Tag the record with its type in the metadata namespace.
    pub fn into_variant(self) -> TypedVariant {
        TypedVariant::object(self.type_name, METADATA_NAMESPACE, self.fields)
    }
}

/// Converts application objects into [`MetadataRecord`]s and tagged variants.
#[derive(Debug, Clone)]
pub struct ObjectMarshaller {
    registry: TypeSchemaRegistry,
}

impl ObjectMarshaller {
    pub fn new(registry: TypeSchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeSchemaRegistry {
        &self.registry
    }

    /// Marshal one object as `type_name`.
    ///
    /// Fields are emitted in the object's order. A field without a declared
    /// type is dropped unless it is `Id`. Declared `date`, `dateTime` and
    /// `base64Binary` fields are converted to their text forms.
    pub fn create_record<O>(&self, object: &O, type_name: &str) -> MetadataRecord
    where
        O: MetadataObject + ?Sized,
    {
        let mut fields = Fields::new();

        for (name, value) in object.fields() {
            let declared = self.registry.field_type(type_name, &name);
            if declared.is_none() && name != ID_FIELD {
                continue;
            }

            let value = match declared {
                Some(field_type) => convert(field_type, value),
                None => value,
            };
            fields.insert(name, value);
        }

        MetadataRecord {
            type_name: type_name.to_string(),
            fields,
        }
    }

    /// Marshal objects grouped by type into a flat list of tagged variants.
    ///
    /// Types are visited in iteration order and objects in slice order.
    pub fn create_variants<'a, O, I>(&self, objects_by_type: I) -> Vec<TypedVariant>
    where
        O: MetadataObject + 'a,
        I: IntoIterator<Item = (&'a str, &'a [O])>,
    {
        objects_by_type
            .into_iter()
            .flat_map(|(type_name, objects)| {
                objects
                    .iter()
                    .map(move |object| self.create_record(object, type_name).into_variant())
            })
            .collect()
    }
}

fn convert(field_type: &str, value: Value) -> Value {
    match (field_type, value) {
        ("date", Value::DateTime(dt)) => Value::String(dt.format("%Y-%m-%d").to_string()),
        ("dateTime", Value::DateTime(dt)) => {
            Value::String(dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
        }
        ("base64Binary", value) => {
            Value::String(general_purpose::STANDARD.encode(raw_bytes(&value)))
        }
        (_, value) => value,
    }
}

fn raw_bytes(value: &Value) -> Vec<u8> {
    match value {
        Value::Bytes(bytes) => bytes.clone(),
        other => other.to_text().unwrap_or_default().into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn marshaller() -> ObjectMarshaller {
        ObjectMarshaller::new(TypeSchemaRegistry::new(
            "Metadata",
            vec![
                "struct Metadata {\n string fullName;\n}".to_string(),
                "struct Event {\n string label;\n date startDate;\n dateTime startsAt;\n base64Binary content;\n int count;\n}".to_string(),
            ],
        ))
    }

    fn object(fields: &[(&str, Value)]) -> Fields {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_date_time_keeps_explicit_offset() {
        let at = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap();
        let record = marshaller().create_record(&object(&[("startsAt", Value::from(at))]), "Event");

        assert_eq!(
            record.fields.get("startsAt"),
            Some(&Value::from("2024-01-02T03:04:05+02:00"))
        );

        let utc = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let record = marshaller().create_record(&object(&[("startsAt", Value::from(utc))]), "Event");
        assert_eq!(
            record.fields.get("startsAt"),
            Some(&Value::from("2024-01-02T03:04:05+00:00"))
        );
    }

    #[test]
    fn test_date_drops_time_of_day() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
        let record = marshaller().create_record(&object(&[("startDate", Value::from(at))]), "Event");
        assert_eq!(record.fields.get("startDate"), Some(&Value::from("2024-03-09")));
    }

    #[test]
    fn test_date_passes_through_non_date_values() {
        let record = marshaller().create_record(
            &object(&[("startDate", Value::from("2024-03-09"))]),
            "Event",
        );
        assert_eq!(record.fields.get("startDate"), Some(&Value::from("2024-03-09")));
    }

    #[test]
    fn test_base64_binary_decodes_to_original_bytes() {
        let bytes: Vec<u8> = vec![0, 159, 146, 150, 255, b'\n'];
        let record = marshaller().create_record(&object(&[("content", Value::Bytes(bytes.clone()))]), "Event");

        let encoded = record.fields.get("content").and_then(Value::as_str).unwrap();
        assert_eq!(general_purpose::STANDARD.decode(encoded).unwrap(), bytes);

        let record = marshaller().create_record(&object(&[("content", Value::from("hello"))]), "Event");
        assert_eq!(record.fields.get("content"), Some(&Value::from("aGVsbG8=")));
    }

    #[test]
    fn test_id_is_kept_without_declaration() {
        let record = marshaller().create_record(
            &object(&[
                ("Id", Value::from("a01xx0000000001")),
                ("undeclared", Value::from("gone")),
                ("label", Value::from("Launch")),
            ]),
            "Event",
        );

        assert_eq!(record.fields.get("Id"), Some(&Value::from("a01xx0000000001")));
        assert!(!record.fields.contains_key("undeclared"));
        assert_eq!(record.fields.len(), 2);
    }

    #[test]
    fn test_unknown_type_keeps_only_id() {
        let record = marshaller().create_record(
            &object(&[("Id", Value::from("1")), ("label", Value::from("x"))]),
            "Nope",
        );
        assert_eq!(record.fields.keys().collect::<Vec<_>>(), vec!["Id"]);
    }

    #[test]
    fn test_record_follows_source_order_and_root_fields() {
        let record = marshaller().create_record(
            &object(&[
                ("count", Value::from(3)),
                ("fullName", Value::from("Launch__e")),
                ("label", Value::from("Launch")),
            ]),
            "Event",
        );

        assert_eq!(
            record.fields.keys().collect::<Vec<_>>(),
            vec!["count", "fullName", "label"]
        );
        assert_eq!(record.fields.get("count"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_json_objects_marshal() {
        let json = serde_json::json!({"fullName": "Launch__e", "label": "Launch", "extra": 1});
        let record = marshaller().create_record(&json, "Event");
        assert_eq!(record.fields.get("fullName"), Some(&Value::from("Launch__e")));
        assert!(!record.fields.contains_key("extra"));

        let record = marshaller().create_record(&serde_json::json!("scalar"), "Event");
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_create_variants_preserves_order() {
        let first = object(&[("fullName", Value::from("A"))]);
        let second = object(&[("fullName", Value::from("B"))]);
        let third = object(&[("fullName", Value::from("C"))]);
        let events = [first, second];
        let roots = [third];

        let variants = marshaller().create_variants([("Event", &events[..]), ("Metadata", &roots[..])]);

        let names: Vec<_> = variants
            .iter()
            .map(|v| (v.type_name.as_str(), v.fields.get("fullName").and_then(Value::as_str)))
            .collect();
        assert_eq!(
            names,
            vec![("Event", Some("A")), ("Event", Some("B")), ("Metadata", Some("C"))]
        );
        assert!(variants.iter().all(|v| v.namespace == METADATA_NAMESPACE));
    }
}
