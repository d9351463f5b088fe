use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use invdb_core::Entity;

/// Field names owned by the record itself; never valid as attribute keys.
pub const RESERVED_FIELDS: [&str; 2] = ["index", "quantity"];

/// A single inventory record.
///
/// `index` identifies the slot and never changes for a stored record.
/// `quantity` is the stock count; negative values are representable so that
/// a bad request can be described and rejected, but never stored.
/// Any other fields travel in `attributes` and are passed through untouched.
/// Attributes share the record's JSON object, so they may not reuse the names
/// in [`RESERVED_FIELDS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub index: u64,
    pub quantity: i64,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, JsonValue>,
}

impl Entry {
    pub fn new(index: u64, quantity: i64) -> Self {
        Self {
            index,
            quantity,
            attributes: Map::new(),
        }
    }

    /// Attach an opaque descriptive field.
    ///
    /// Keys in [`RESERVED_FIELDS`] are ignored.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let key = key.into();
        if is_reserved(&key) {
            tracing::debug!(%key, "ignoring reserved attribute key");
            return self;
        }
        self.attributes.insert(key, value.into());
        self
    }

    /// First attribute key that collides with a record field, if any.
    pub fn reserved_attribute(&self) -> Option<&str> {
        self.attributes
            .keys()
            .map(String::as_str)
            .find(|key| is_reserved(key))
    }

    pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
        self.attributes.get(key)
    }

    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_FIELDS.contains(&key)
}

impl Entity for Entry {
    type Id = u64;

    fn id(&self) -> &Self::Id {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_fields_round_trip_through_attributes() {
        let raw = json!({ "index": 3, "quantity": 5, "name": "widget", "bin": "A-12" });
        let entry: Entry = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(entry.index, 3);
        assert_eq!(entry.quantity, 5);
        assert_eq!(entry.attribute("name"), Some(&json!("widget")));
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn bare_entry_serializes_without_attributes() {
        let entry = Entry::new(1, 0);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "index": 1, "quantity": 0 })
        );
        assert!(!entry.is_available());
    }

    #[test]
    fn wrong_typed_quantity_does_not_decode() {
        let raw = json!({ "index": 3, "quantity": "five" });
        assert!(serde_json::from_value::<Entry>(raw).is_err());
    }

    #[test]
    fn reserved_keys_are_not_attached() {
        let entry = Entry::new(3, 5)
            .with_attribute("quantity", "lots")
            .with_attribute("index", 99)
            .with_attribute("name", "hinge");

        assert_eq!(entry.attribute("quantity"), None);
        assert_eq!(entry.reserved_attribute(), None);

        let wire = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.quantity, 5);
    }

    #[test]
    fn directly_inserted_reserved_key_is_reported() {
        let mut entry = Entry::new(3, 5);
        entry.attributes.insert("quantity".into(), json!("lots"));
        assert_eq!(entry.reserved_attribute(), Some("quantity"));
    }

    #[test]
    fn identity_is_the_index() {
        let entry = Entry::new(9, 2).with_attribute("name", "bolt");
        assert_eq!(*entry.id(), 9);
    }
}
