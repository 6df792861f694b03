use rustc_hash::FxHashSet;
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, SerializeMap, Serializer};
use smol_str::{SmolStr, StrExt};
use std::collections::BTreeMap;

use crate::value::FieldValue;

pub type FastMap<K, V> = BTreeMap<K, V>;

// ─── Field Names ────────────────────────────────────────────────────────────

/// Key under which the metadata block travels in a record payload.
pub const ATTRIBUTES_KEY: &str = "attributes";
pub const ID_FIELD: &str = "id";

/// Canonical storage form of a field name. Every lookup and write goes
/// through here, so `Name`, `name` and `NAME` address the same slot.
#[inline]
pub fn normalize_field_name(name: &str) -> SmolStr {
    name.to_lowercase_smolstr()
}

// ─── ChangeSet ──────────────────────────────────────────────────────────────

/// Insertion-ordered set of normalized field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    order: Vec<SmolStr>,
    members: FxHashSet<SmolStr>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the name was not yet present.
    pub fn insert(&mut self, name: SmolStr) -> bool {
        if self.members.contains(name.as_str()) {
            return false;
        }
        self.members.insert(name.clone());
        self.order.push(name);
        true
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &SmolStr> {
        self.order.iter()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

// ─── Attributes ─────────────────────────────────────────────────────────────

pub const ATTR_TYPE: &str = "type";
pub const ATTR_URL: &str = "url";
pub const ATTR_EXTERNAL_ID: &str = "externalId";
pub const ATTR_EXTERNAL_ID_FIELD: &str = "externalIdField";

/// Metadata block carried alongside the fields of a record.
///
/// Stored as one map with keys exactly as supplied, so every key has a
/// single value and nothing is added that the input did not carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: FastMap<SmolStr, FieldValue>,
}

impl Attributes {
    pub fn new(record_type: impl Into<SmolStr>) -> Self {
        let mut attrs = Self::default();
        attrs.insert(ATTR_TYPE, FieldValue::Str(record_type.into()));
        attrs
    }

    pub fn with_url(mut self, url: impl Into<SmolStr>) -> Self {
        self.insert(ATTR_URL, FieldValue::Str(url.into()));
        self
    }

    pub fn from_map(entries: FastMap<SmolStr, FieldValue>) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.get(key)
    }

    /// Sets a metadata key, returning the value it replaces.
    pub fn insert(
        &mut self,
        key: impl Into<SmolStr>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// `None` when `type` is absent or not a string.
    pub fn record_type(&self) -> Option<&str> {
        self.get(ATTR_TYPE)?.as_str()
    }

    pub fn url(&self) -> Option<&str> {
        self.get(ATTR_URL)?.as_str()
    }

    pub fn external_id(&self) -> Option<&FieldValue> {
        self.get(ATTR_EXTERNAL_ID)
    }

    pub fn external_id_field(&self) -> Option<&str> {
        self.get(ATTR_EXTERNAL_ID_FIELD)?.as_str()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match FieldValue::deserialize(deserializer)? {
            FieldValue::Object(map) => Ok(Attributes::from_map(map)),
            _ => Err(D::Error::custom("record attributes must be an object")),
        }
    }
}
