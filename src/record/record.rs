use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::error::RecordError;
use crate::types::*;
use crate::value::FieldValue;

// ─── Record ─────────────────────────────────────────────────────────────────

/// A single business object: metadata plus case-insensitive, change-tracked
/// fields.
///
/// Field names are stored lower-cased. Every field supplied at construction
/// counts as changed; `previous` only fills once a field is overwritten
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub(crate) attributes: Attributes,
    pub(crate) fields: FastMap<SmolStr, FieldValue>,
    pub(crate) changed: ChangeSet,
    pub(crate) previous: FastMap<SmolStr, FieldValue>,
}

impl Record {
    /// Builds a record from typed attributes and `(name, value)` pairs.
    /// Pairs are applied in iteration order, so a later `NAME` overrides an
    /// earlier `Name`.
    pub fn new<I, K, V>(attributes: Attributes, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut record = Self {
            attributes,
            fields: FastMap::new(),
            changed: ChangeSet::new(),
            previous: FastMap::new(),
        };
        for (name, value) in fields {
            let key = normalize_field_name(name.as_ref());
            if key == ATTRIBUTES_KEY {
                warn!(field = name.as_ref(), "ignoring field that shadows record attributes");
                continue;
            }
            record.fields.insert(key.clone(), value.into());
            record.changed.insert(key);
        }
        debug!(
            record_type = record.attributes.record_type().unwrap_or_default(),
            fields = record.fields.len(),
            "constructed record"
        );
        record
    }

    /// Builds a record with no fields.
    pub fn empty(attributes: Attributes) -> Self {
        Self::new(attributes, std::iter::empty::<(&str, FieldValue)>())
    }

    /// Builds a record from an untyped payload of the shape
    /// `{ "attributes": { "type": .. }, "<Field>": <value>, .. }`.
    pub fn from_value(value: FieldValue) -> Result<Self, RecordError> {
        let FieldValue::Object(mut map) = value else {
            return Err(RecordError::NotAnObject);
        };
        let attributes = match map.remove(ATTRIBUTES_KEY) {
            Some(FieldValue::Object(attrs)) => Attributes::from_map(attrs),
            Some(_) => return Err(RecordError::InvalidAttributes),
            None => return Err(RecordError::MissingAttributes),
        };
        Ok(Self::new(attributes, map))
    }
}
