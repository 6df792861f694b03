use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::convert::TryFrom;
use std::fmt;

use crate::types::FastMap;

// ─── FieldNumber ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl FieldNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            FieldNumber::I64(i) => i as f64,
            FieldNumber::U64(u) => u as f64,
            FieldNumber::F64(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            FieldNumber::I64(i) => Some(i),
            FieldNumber::U64(u) => i64::try_from(u).ok(),
            FieldNumber::F64(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }
}

// ─── FieldValue ─────────────────────────────────────────────────────────────

/// The value held by a single record field.
///
/// Salesforce-style payloads are JSON, so this mirrors the JSON data model.
/// Nested arrays and objects are stored as-is and are not change-tracked
/// on their own.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(FieldNumber),
    Str(SmolStr),
    Array(Vec<FieldValue>),
    Object(FastMap<SmolStr, FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&FastMap<SmolStr, FieldValue>> {
        match self {
            FieldValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Number(n) => match n {
                FieldNumber::I64(i) => serializer.serialize_i64(*i),
                FieldNumber::U64(u) => serializer.serialize_u64(*u),
                FieldNumber::F64(f) => serializer.serialize_f64(*f),
            },
            FieldValue::Str(s) => serializer.serialize_str(s.as_str()),
            FieldValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            FieldValue::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
        }
    }
}

// ─── Deserialize (self-describing: JSON, CBOR) ──────────────────────────────

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-compatible value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<FieldValue, E> {
        Ok(FieldValue::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(FieldNumber::I64(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        // Keep small unsigned ints in the signed lane so JSON and CBOR agree.
        Ok(match i64::try_from(v) {
            Ok(i) => FieldValue::Number(FieldNumber::I64(i)),
            Err(_) => FieldValue::Number(FieldNumber::U64(v)),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(FieldNumber::F64(v)))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::Str(SmolStr::from(s)))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<FieldValue, E> {
        Ok(FieldValue::Str(SmolStr::from(s)))
    }

    fn visit_none<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<FieldValue, D::Error> {
        FieldValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FieldValue, A::Error> {
        let mut arr = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(v) = seq.next_element()? {
            arr.push(v);
        }
        Ok(FieldValue::Array(arr))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldValue, A::Error> {
        let mut map = FastMap::new();
        while let Some((k, v)) = access.next_entry::<SmolStr, FieldValue>()? {
            map.insert(k, v);
        }
        Ok(FieldValue::Object(map))
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(FieldNumber::F64(n))
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(FieldNumber::I64(n))
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Number(FieldNumber::U64(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(SmolStr::from(s))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for FieldValue {
    fn from(s: SmolStr) -> Self {
        FieldValue::Str(s)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

// ─── From serde_json::Value ────────────────────────────────────────────────

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Number(FieldNumber::I64(i))
                } else if let Some(u) = n.as_u64() {
                    FieldValue::Number(FieldNumber::U64(u))
                } else {
                    FieldValue::Number(FieldNumber::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => FieldValue::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                FieldValue::Array(arr.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(obj) => FieldValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_numbers_land_in_the_narrowest_lane() {
        let v = FieldValue::from(serde_json::json!([1, -2, 18446744073709551615u64, 1.5]));
        let FieldValue::Array(arr) = &v else {
            panic!("expected array, got {v:?}");
        };
        assert_eq!(arr[0], FieldValue::from(1i64));
        assert_eq!(arr[1], FieldValue::from(-2i64));
        assert_eq!(arr[2], FieldValue::from(u64::MAX));
        assert_eq!(arr[3], FieldValue::from(1.5f64));
    }

    #[test]
    fn deserialize_matches_json_conversion() {
        let text = r#"{"Name":"Acme","Employees":12,"Active":true,"Parent":null,"Tags":["a","b"]}"#;
        let direct: FieldValue = serde_json::from_str(text).unwrap();
        let via_json = FieldValue::from(serde_json::from_str::<serde_json::Value>(text).unwrap());
        assert_eq!(direct, via_json);
    }

    #[test]
    fn cbor_decodes_into_field_value() {
        let original = FieldValue::from(serde_json::json!({"name": "Acme", "size": 3, "ok": false}));
        let bytes = cbor4ii::serde::to_vec(Vec::new(), &original).unwrap();
        let decoded: FieldValue = cbor4ii::serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn option_maps_none_to_null() {
        assert!(FieldValue::from(None::<&str>).is_null());
        assert_eq!(FieldValue::from(Some("x")).as_str(), Some("x"));
    }

    #[test]
    fn integral_float_reads_as_i64() {
        assert_eq!(FieldValue::from(4.0f64).as_i64(), Some(4));
        assert_eq!(FieldValue::from(4.5f64).as_i64(), None);
        assert_eq!(FieldValue::from(7i64).as_f64(), Some(7.0));
    }
}
