use smol_str::SmolStr;

use super::record::Record;
use crate::types::*;
use crate::value::FieldValue;

impl Record {
    // ════════════════════════════════════════════════════════════════════════
    // Field access
    // ════════════════════════════════════════════════════════════════════════

    /// Current value of a field, looked up case-insensitively.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(normalize_field_name(name).as_str())
    }

    #[inline]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    #[inline]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_i64()
    }

    #[inline]
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    #[inline]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(normalize_field_name(name).as_str())
    }

    /// All current fields, keyed by lower-cased name.
    pub fn fields(&self) -> &FastMap<SmolStr, FieldValue> {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(SmolStr::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Metadata
    // ════════════════════════════════════════════════════════════════════════

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// `attributes.type`, when present as a string.
    pub fn record_type(&self) -> Option<&str> {
        self.attributes.record_type()
    }

    /// The `id` field; a plain field, not metadata.
    pub fn id(&self) -> Option<&FieldValue> {
        self.get(ID_FIELD)
    }

    pub fn url(&self) -> Option<&str> {
        self.attributes.url()
    }

    pub fn external_id(&self) -> Option<&FieldValue> {
        self.attributes.external_id()
    }

    /// Lower-cased name of the field used as external id.
    pub fn external_id_field(&self) -> Option<&str> {
        self.attributes.external_id_field()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Change tracking
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn has_changed(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Whether the field was written since construction, whether or not the
    /// value actually differs.
    #[inline]
    pub fn has_field_changed(&self, name: &str) -> bool {
        self.changed.contains(normalize_field_name(name).as_str())
    }

    /// Changed fields paired with their *current* values.
    pub fn changed(&self) -> FastMap<SmolStr, FieldValue> {
        self.changed
            .iter()
            .filter_map(|name| {
                self.fields
                    .get(name.as_str())
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }

    /// Changed field names in the order they were first written.
    pub fn changed_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.changed.iter().map(SmolStr::as_str)
    }

    /// Values each field held right before its most recent overwrite.
    pub fn previous_all(&self) -> &FastMap<SmolStr, FieldValue> {
        &self.previous
    }

    pub fn previous_of(&self, name: &str) -> Option<&FieldValue> {
        self.previous.get(normalize_field_name(name).as_str())
    }
}
