//! Parameter bag of a forwarded API call and its wire encoding.

use crate::core::domain::error::ValidationError;
use serde_json::Value;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Sent as an empty value; PVE reads it as "clear this field".
    Null,
}

impl ParamValue {
    fn encode(&self) -> String {
        match self {
            ParamValue::String(s) => s.clone(),
            ParamValue::Integer(i) => i.to_string(),
            // NaN and the infinities have no wire form; they go out empty.
            ParamValue::Float(f) if !f.is_finite() => String::new(),
            ParamValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Null => String::new(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

macro_rules! integer_param {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                ParamValue::Integer(i64::from(value))
            }
        })*
    };
}

integer_param!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Integer(i),
                None => ParamValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => ParamValue::String(s),
            other => ParamValue::String(other.to_string()),
        }
    }
}

/// Insertion-ordered parameters of an API call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams(Vec<(String, ParamValue)>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a parameter, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drops every parameter whose value is `Null`.
    pub(crate) fn strip_nulls(&mut self) {
        self.0.retain(|(_, v)| *v != ParamValue::Null);
    }

    /// PVE has no boolean encoding: `true` becomes `1`, `false` becomes `0`.
    pub(crate) fn coerce_booleans(&mut self) {
        for (_, value) in &mut self.0 {
            if let ParamValue::Bool(b) = value {
                *value = ParamValue::Integer(i64::from(*b));
            }
        }
    }

    /// `application/x-www-form-urlencoded` serialization, used for both the
    /// query string and the form body.
    pub(crate) fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.0 {
            serializer.append_pair(name, &value.encode());
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RequestParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl TryFrom<Value> for RequestParams {
    type Error = ValidationError;

    /// Accepts a JSON object; nested arrays and objects are sent as JSON text.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            Value::Null => Ok(RequestParams::new()),
            other => Err(ValidationError::Format(format!(
                "Request parameters must be a JSON object, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_coercion() {
        let mut params = RequestParams::new().with("full", true).with("force", false);
        params.coerce_booleans();

        assert_eq!(params.get("full"), Some(&ParamValue::Integer(1)));
        assert_eq!(params.get("force"), Some(&ParamValue::Integer(0)));
        assert_eq!(params.encode(), "full=1&force=0");
    }

    #[test]
    fn test_non_finite_floats_encode_empty() {
        let params = RequestParams::new()
            .with("a", f64::NAN)
            .with("b", f64::INFINITY)
            .with("c", f64::NEG_INFINITY)
            .with("d", 0.5);
        assert_eq!(params.encode(), "a=&b=&c=&d=0.5");
    }

    #[test]
    fn test_strip_nulls_keeps_order() {
        let mut params = RequestParams::new()
            .with("a", "x")
            .with("delete", None::<String>)
            .with("b", 2);
        params.strip_nulls();

        assert_eq!(params.len(), 2);
        assert_eq!(params.encode(), "a=x&b=2");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = RequestParams::new().with("a", 1).with("b", 2);
        params.insert("a", 3);
        assert_eq!(params.encode(), "a=3&b=2");
    }

    #[test]
    fn test_encoding_escapes_values() {
        let params = RequestParams::new()
            .with("username", "root@pam")
            .with("description", "web & db")
            .with("empty", ParamValue::Null);
        assert_eq!(params.encode(), "username=root%40pam&description=web+%26+db&empty=");
    }

    #[test]
    fn test_number_encoding() {
        let params = RequestParams::new()
            .with("vmid", 100u32)
            .with("ratio", 0.5)
            .with("cores", 2.0);
        assert_eq!(params.encode(), "vmid=100&ratio=0.5&cores=2");
    }

    #[test]
    fn test_try_from_json() {
        let params = RequestParams::try_from(json!({"full": true, "node": "pve1", "x": null})).unwrap();
        assert_eq!(params.get("full"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("x"), Some(&ParamValue::Null));
        assert!(RequestParams::try_from(json!([1, 2])).is_err());
        assert!(RequestParams::try_from(Value::Null).unwrap().is_empty());
    }
}
