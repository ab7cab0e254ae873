//! Geolocation record returned by an IP lookup.
//!
//! The lookup service answers with a flat JSON object of loosely typed
//! values. Only scalars are meaningful; anything else is reported as a
//! type mismatch instead of being stringified.

use std::collections::HashMap;

use simd_json::{OwnedValue, StaticNode};
use thiserror::Error;

/// Text rendered for a JSON `null`
pub const NIL_PLACEHOLDER: &str = "<nil>";

/// Errors raised while reading a [`LocationRecord`].
#[derive(Debug, Error)]
pub enum LocationError {
    /// The value exists but is not a scalar
    #[error("value at key '{key}' has unsupported type {kind}")]
    TypeMismatch { key: String, kind: &'static str },

    /// The key is absent
    #[error("missing key '{0}'")]
    MissingKey(String),

    /// A coordinate string could not be parsed
    #[error("malformed coordinate '{value}': {reason}")]
    Format { value: String, reason: String },

    /// The lookup body is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] simd_json::Error),

    /// The lookup body is valid JSON but not an object
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// A loosely typed record value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Null,
    String(String),
    /// Any non-scalar, tagged with its JSON kind
    Other(&'static str),
}

impl Value {
    /// Render as text, or `None` for kinds that have no text form
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Null => Some(NIL_PLACEHOLDER.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Other(_) => None,
        }
    }
}

impl From<OwnedValue> for Value {
    fn from(value: OwnedValue) -> Self {
        match value {
            OwnedValue::Static(StaticNode::Bool(b)) => Value::Bool(b),
            OwnedValue::Static(StaticNode::Null) => Value::Null,
            OwnedValue::Static(StaticNode::F64(n)) => Value::Number(n),
            OwnedValue::Static(StaticNode::I64(n)) => Value::Number(n as f64),
            OwnedValue::Static(StaticNode::U64(n)) => Value::Number(n as f64),
            OwnedValue::String(s) => Value::String(s),
            other => Value::Other(kind_name(&other)),
        }
    }
}

fn kind_name(value: &OwnedValue) -> &'static str {
    match value {
        OwnedValue::Static(StaticNode::Null) => "null",
        OwnedValue::Static(StaticNode::Bool(_)) => "boolean",
        OwnedValue::Static(_) => "number",
        OwnedValue::String(_) => "string",
        OwnedValue::Array(_) => "array",
        OwnedValue::Object(_) => "object",
    }
}

/// Scientific notation with the shortest round-trip mantissa and a signed,
/// two-digit minimum exponent: `42.0` -> `4.2E+01`.
fn format_number(n: f64) -> String {
    let formatted = format!("{n:E}");
    match formatted.split_once('E') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        // inf / NaN have no exponent
        None => formatted,
    }
}

/// Parsed geolocation attributes for one IP address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationRecord {
    fields: HashMap<String, Value>,
}

impl LocationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a lookup body. Parsing happens in place, so the buffer is
    /// clobbered.
    pub fn from_json(bytes: &mut [u8]) -> Result<Self, LocationError> {
        match simd_json::to_owned_value(bytes)? {
            OwnedValue::Object(object) => Ok((*object)
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect()),
            other => Err(LocationError::NotAnObject(kind_name(&other))),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value at `key` rendered as text
    pub fn get_key(&self, key: &str) -> Result<String, LocationError> {
        let value = self
            .get(key)
            .ok_or_else(|| LocationError::MissingKey(key.to_string()))?;

        match value {
            Value::Other(kind) => Err(LocationError::TypeMismatch {
                key: key.to_string(),
                kind: *kind,
            }),
            scalar => Ok(scalar.as_text().unwrap_or_default()),
        }
    }

    /// The `(longitude, latitude)` pair from the `"loc"` field.
    ///
    /// The field is written latitude first (`"39.96,-83.00"`), so the tokens
    /// come back swapped.
    pub fn coordinate(&self) -> Result<(f64, f64), LocationError> {
        let loc = self.get_key("loc")?;

        let format_err = |reason: String| LocationError::Format {
            value: loc.clone(),
            reason,
        };

        let parts: Vec<&str> = loc.split(',').collect();
        let [lat, lon] = parts.as_slice() else {
            return Err(format_err(format!(
                "expected 2 comma-separated values, found {}",
                parts.len()
            )));
        };

        let longitude: f64 = lon
            .parse()
            .map_err(|e| format_err(format!("longitude '{lon}': {e}")))?;
        let latitude: f64 = lat
            .parse()
            .map_err(|e| format_err(format!("latitude '{lat}': {e}")))?;

        Ok((longitude, latitude))
    }
}

impl FromIterator<(String, Value)> for LocationRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> LocationRecord {
        LocationRecord::from_json(&mut json.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_get_key_string() {
        assert_eq!(record(r#"{"city": "Columbus"}"#).get_key("city").unwrap(), "Columbus");
    }

    #[test]
    fn test_get_key_bool() {
        let rec = record(r#"{"active": true, "bogon": false}"#);
        assert_eq!(rec.get_key("active").unwrap(), "true");
        assert_eq!(rec.get_key("bogon").unwrap(), "false");
    }

    #[test]
    fn test_get_key_null() {
        assert_eq!(record(r#"{"x": null}"#).get_key("x").unwrap(), "<nil>");
    }

    #[test]
    fn test_get_key_number() {
        let rec = record(r#"{"a": 42, "b": -83.0, "c": 0.00125, "d": 0, "e": 1e100}"#);
        assert_eq!(rec.get_key("a").unwrap(), "4.2E+01");
        assert_eq!(rec.get_key("b").unwrap(), "-8.3E+01");
        assert_eq!(rec.get_key("c").unwrap(), "1.25E-03");
        assert_eq!(rec.get_key("d").unwrap(), "0E+00");
        assert_eq!(rec.get_key("e").unwrap(), "1E+100");
    }

    #[test]
    fn test_get_key_array_is_type_mismatch() {
        let err = record(r#"{"x": [1, 2]}"#).get_key("x").unwrap_err();
        assert!(matches!(err, LocationError::TypeMismatch { ref key, kind: "array" } if key == "x"));
    }

    #[test]
    fn test_get_key_object_is_type_mismatch() {
        let err = record(r#"{"asn": {"asn": "AS15169"}}"#).get_key("asn").unwrap_err();
        assert!(matches!(err, LocationError::TypeMismatch { kind: "object", .. }));
    }

    #[test]
    fn test_get_key_missing() {
        let err = record(r#"{"city": "Columbus"}"#).get_key("hostname").unwrap_err();
        assert!(matches!(err, LocationError::MissingKey(ref k) if k == "hostname"));
        assert_eq!(err.to_string(), "missing key 'hostname'");
    }

    #[test]
    fn test_coordinate_is_lon_then_lat() {
        // "loc" is written lat,lon; the pair comes back lon,lat
        let (lon, lat) = record(r#"{"loc": "39.96,-83.00"}"#).coordinate().unwrap();
        assert_eq!(lon, -83.00);
        assert_eq!(lat, 39.96);
    }

    #[test]
    fn test_coordinate_single_token() {
        let err = record(r#"{"loc": "bad"}"#).coordinate().unwrap_err();
        assert!(matches!(err, LocationError::Format { .. }));
    }

    #[test]
    fn test_coordinate_too_many_tokens() {
        let err = record(r#"{"loc": "1,2,3"}"#).coordinate().unwrap_err();
        assert!(matches!(err, LocationError::Format { ref value, .. } if value == "1,2,3"));
    }

    #[test]
    fn test_coordinate_unparsable_number() {
        let err = record(r#"{"loc": "39.96,west"}"#).coordinate().unwrap_err();
        assert!(matches!(err, LocationError::Format { ref reason, .. } if reason.contains("west")));
    }

    #[test]
    fn test_coordinate_rejects_padding() {
        let err = record(r#"{"loc": "39.96, -83.00"}"#).coordinate().unwrap_err();
        assert!(matches!(err, LocationError::Format { .. }));
    }

    #[test]
    fn test_coordinate_missing_loc() {
        let err = record(r#"{"city": "Columbus"}"#).coordinate().unwrap_err();
        assert!(matches!(err, LocationError::MissingKey(ref k) if k == "loc"));
    }

    #[test]
    fn test_coordinate_non_string_loc() {
        let err = record(r#"{"loc": [39.96, -83.0]}"#).coordinate().unwrap_err();
        assert!(matches!(err, LocationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = LocationRecord::from_json(&mut b"[1, 2]".to_vec()).unwrap_err();
        assert!(matches!(err, LocationError::NotAnObject("array")));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = LocationRecord::from_json(&mut b"{\"ip\": ".to_vec()).unwrap_err();
        assert!(matches!(err, LocationError::Json(_)));
    }

    #[test]
    fn test_from_json_ipinfo_body() {
        let rec = record(
            r#"{
                "ip": "8.8.8.8",
                "hostname": "dns.google",
                "city": "Mountain View",
                "region": "California",
                "country": "US",
                "loc": "37.4056,-122.0775",
                "org": "AS15169 Google LLC",
                "postal": "94043",
                "timezone": "America/Los_Angeles",
                "anycast": true
            }"#,
        );
        assert_eq!(rec.len(), 10);
        assert_eq!(rec.get("anycast"), Some(&Value::Bool(true)));
        assert_eq!(rec.coordinate().unwrap(), (-122.0775, 37.4056));
    }

    #[test]
    fn test_collect_and_insert() {
        let mut rec: LocationRecord = [("city".to_string(), Value::String("Oslo".into()))]
            .into_iter()
            .collect();
        rec.insert("loc", Value::String("59.91,10.75".into()));
        assert_eq!(rec.coordinate().unwrap(), (10.75, 59.91));
        assert!(!rec.is_empty());
        assert!(LocationRecord::new().is_empty());
    }

    #[test]
    fn test_collect_keeps_last_duplicate() {
        let rec: LocationRecord = [
            ("city".to_string(), Value::String("Oslo".into())),
            ("city".to_string(), Value::String("Bergen".into())),
        ]
        .into_iter()
        .collect();
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get_key("city").unwrap(), "Bergen");
    }
}
