use serde::de::{self, Deserializer, Error as _, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

use crate::error::RecordError;
use crate::record::Record;
use crate::types::*;
use crate::value::FieldValue;

// ─── Serde ──────────────────────────────────────────────────────────────────
//
// Wire shape is the construction shape:
//   { "attributes": { "type": .., "url": .. }, "<field>": <value>, .. }
// Fields go out under their lower-cased names.

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.fields.len() + 1))?;
        m.serialize_entry(ATTRIBUTES_KEY, &self.attributes)?;
        for (k, v) in &self.fields {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        DecodedRecord::deserialize(deserializer)?
            .0
            .map_err(D::Error::custom)
    }
}

// ─── Streaming decode ───────────────────────────────────────────────────────
//
// Entries are applied in payload order, so `changed` follows the payload and
// a later `NAME` overrides an earlier `Name`. A well-formed document of the
// wrong shape decodes to `Err(RecordError)` instead of a codec error.

struct DecodedRecord(Result<Record, RecordError>);

impl DecodedRecord {
    fn not_an_object() -> Self {
        DecodedRecord(Err(RecordError::NotAnObject))
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = DecodedRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DecodedRecord, A::Error> {
        let mut attributes = None;
        let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_key::<SmolStr>()? {
            let value: FieldValue = access.next_value()?;
            if key == ATTRIBUTES_KEY {
                attributes = Some(value);
            } else {
                fields.push((key, value));
            }
        }
        let attributes = match attributes {
            Some(FieldValue::Object(map)) => Attributes::from_map(map),
            Some(_) => return Ok(DecodedRecord(Err(RecordError::InvalidAttributes))),
            None => return Ok(DecodedRecord(Err(RecordError::MissingAttributes))),
        };
        Ok(DecodedRecord(Ok(Record::new(attributes, fields))))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DecodedRecord, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<DecodedRecord, E> {
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<DecodedRecord, E> {
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<DecodedRecord, E> {
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<DecodedRecord, E> {
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<DecodedRecord, E> {
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<DecodedRecord, E> {
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_unit<E: de::Error>(self) -> Result<DecodedRecord, E> {
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_none<E: de::Error>(self) -> Result<DecodedRecord, E> {
        Ok(DecodedRecord::not_an_object())
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<DecodedRecord, D::Error> {
        deserializer.deserialize_any(RecordVisitor)
    }
}

impl<'de> Deserialize<'de> for DecodedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordVisitor)
    }
}

// ─── JSON / CBOR helpers ────────────────────────────────────────────────────

impl Record {
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, RecordError> {
        DecodedRecord::deserialize(value)?.0
    }

    pub fn from_json_str(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str::<DecodedRecord>(json)?.0
    }

    pub fn from_cbor_slice(data: &[u8]) -> Result<Self, RecordError> {
        cbor4ii::serde::from_slice::<DecodedRecord>(data)
            .map_err(|e| RecordError::CborError(format!("{e:?}")))?
            .0
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, RecordError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_cbor_vec(&self) -> Result<Vec<u8>, RecordError> {
        cbor4ii::serde::to_vec(Vec::new(), self)
            .map_err(|e| RecordError::CborError(format!("{e:?}")))
    }
}

// ─── Write-back payload ─────────────────────────────────────────────────────

/// Which fields go into a write-back payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadMode {
    /// Only fields written since construction or the last reset.
    #[default]
    Changed,
    All,
}

impl Record {
    /// Field mapping to send back to the store. Neither `attributes` nor
    /// `id` are included: the id addresses the record, it isn't written.
    pub fn to_payload(&self, mode: PayloadMode) -> FastMap<SmolStr, FieldValue> {
        let mut payload = match mode {
            PayloadMode::Changed => self.changed(),
            PayloadMode::All => self.fields.clone(),
        };
        payload.remove(ID_FIELD);
        payload
    }
}
