//! Key/value store with the browser storage surface

use indexmap::IndexMap;

/// In-memory stand-in for a string storage area. Keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockStorage {
    items: IndexMap<String, String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    /// Returns the removed value, if any.
    pub fn remove_item(&mut self, key: &str) -> Option<String> {
        self.items.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Name of the key at `index`.
    pub fn key(&self, index: usize) -> Option<&str> {
        self.items.get_index(index).map(|(k, _)| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order_survives_removal() {
        let mut storage = MockStorage::new();
        storage.set_item("a", "1");
        storage.set_item("b", "2");
        storage.set_item("c", "3");
        assert_eq!(storage.remove_item("b").as_deref(), Some("2"));

        assert_eq!(storage.key(0), Some("a"));
        assert_eq!(storage.key(1), Some("c"));
        assert_eq!(storage.key(2), None);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut storage = MockStorage::new();
        storage.set_item("theme", "light");
        storage.set_item("lang", "en");
        storage.set_item("theme", "dark");

        assert_eq!(storage.len(), 2);
        assert_eq!(storage.key(0), Some("theme"));
        assert_eq!(storage.get_item("theme").as_deref(), Some("dark"));
    }
}
