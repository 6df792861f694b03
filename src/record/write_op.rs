use tracing::{debug, trace, warn};

use super::record::Record;
use crate::types::*;
use crate::value::FieldValue;

impl Record {
    // ════════════════════════════════════════════════════════════════════════
    // Internal: tracked write
    // ════════════════════════════════════════════════════════════════════════

    fn write_field(&mut self, name: &str, value: FieldValue) {
        let key = normalize_field_name(name);
        if key == ATTRIBUTES_KEY {
            warn!(field = name, "ignoring write that shadows record attributes");
            return;
        }
        let old = self.fields.insert(key.clone(), value);
        let had_previous = old.is_some();
        if let Some(old) = old {
            self.previous.insert(key.clone(), old);
        }
        trace!(field = %key, had_previous, "field written");
        self.changed.insert(key);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Public API
    // ════════════════════════════════════════════════════════════════════════

    /// Writes one field. If it already held a value, that value becomes the
    /// field's `previous`, replacing any older one.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> &mut Self {
        self.write_field(name, value.into());
        self
    }

    /// Writes several fields, in the iteration order of `fields`.
    pub fn set_fields<I, K, V>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        for (name, value) in fields {
            self.write_field(name.as_ref(), value.into());
        }
        self
    }

    pub fn set_id(&mut self, id: impl Into<FieldValue>) -> &mut Self {
        self.set_field(ID_FIELD, id)
    }

    /// Marks `field` as the external-id field with `value`. Pure metadata:
    /// fields and change tracking are left alone.
    pub fn set_external_id(&mut self, field: &str, value: impl Into<FieldValue>) -> &mut Self {
        self.attributes.insert(ATTR_EXTERNAL_ID, value);
        self.attributes
            .insert(ATTR_EXTERNAL_ID_FIELD, FieldValue::Str(normalize_field_name(field)));
        self
    }

    /// Forgets all change tracking, e.g. after the record was written back.
    pub fn reset_changes(&mut self) {
        debug!(
            record_type = self.attributes.record_type().unwrap_or_default(),
            changed = self.changed.len(),
            "resetting change tracking"
        );
        self.changed.clear();
        self.previous.clear();
    }
}
