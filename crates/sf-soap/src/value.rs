//! Values exchanged with a SOAP endpoint.
//!
//! [`Value`] is used on both sides of a call: application objects and
//! operation parameters are expressed as values before encoding, and decoded
//! response payloads come back as values.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Insertion-ordered field map. Element order is significant on the wire.
pub type Fields = IndexMap<String, Value>;

/// A SOAP value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value. Omitted from encoded requests.
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// A point in time with its UTC offset.
    DateTime(DateTime<FixedOffset>),
    /// Raw bytes, base64 encoded on the wire.
    Bytes(Vec<u8>),
    /// Repeated element.
    List(Vec<Value>),
    /// Untyped complex element.
    Struct(Fields),
    /// Complex element carrying an explicit wire type.
    Variant(Box<TypedVariant>),
}

/// SOAP encoding style of a [`TypedVariant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Encoding {
    /// SOAP-ENC object encoding.
    Object,
}

/// A record tagged with its wire type name and namespace.
///
/// Encoded as an element with an `xsi:type` attribute so the service can
/// tell which concrete subtype of an abstract parameter it receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedVariant {
    pub encoding: Encoding,
    pub type_name: String,
    pub namespace: String,
    pub fields: Fields,
}

impl TypedVariant {
    /// Create an object-encoded variant.
    pub fn object(
        type_name: impl Into<String>,
        namespace: impl Into<String>,
        fields: Fields,
    ) -> Self {
        Self {
            encoding: Encoding::Object,
            type_name: type_name.into(),
            namespace: namespace.into(),
            fields,
        }
    }
}

impl Value {
    /// An empty list, returned for calls that produced no payload.
    pub fn empty() -> Self {
        Value::List(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for `Null`, empty lists and empty structs.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::List(items) => items.is_empty(),
            Value::Struct(fields) => fields.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as a boolean. Decoded payloads carry `"true"`/`"false"` text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Fields> {
        match self {
            Value::Struct(fields) => Some(fields),
            Value::Variant(variant) => Some(&variant.fields),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<&TypedVariant> {
        match self {
            Value::Variant(variant) => Some(variant),
            _ => None,
        }
    }

    /// Look up a field of a struct or variant.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_struct().and_then(|fields| fields.get(field))
    }

    /// View the value as a sequence of items.
    ///
    /// A decoded single element is indistinguishable from a one-item list, so
    /// any non-list value is returned as a one-item slice and `Null` as an
    /// empty one.
    pub fn items(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            Value::Null => &[],
            other => std::slice::from_ref(other),
        }
    }

    /// Text form of a scalar value, as it appears inside an XML element.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Double(d) => Some(double_text(*d)),
            Value::String(s) => Some(s.clone()),
            Value::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::Secs, false)),
            Value::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Value::Null | Value::List(_) | Value::Struct(_) | Value::Variant(_) => None,
        }
    }
}

/// xsd:double lexical form.
fn double_text(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        if d > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        d.to_string()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt.fixed_offset())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Struct(fields)
    }
}

impl From<TypedVariant> for Value {
    fn from(variant: TypedVariant) -> Self {
        Value::Variant(Box::new(variant))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Double(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Struct(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}
