use std::collections::HashMap;

use anyhow::Result;
use serde_json::Value;

/// Key holding the sermon [`DisplayOptions`](crate::types::DisplayOptions).
pub const SERMON_OPTIONS_KEY: &str = "soundfaith_embed_sermon_options";
/// Key holding the profile [`DisplayOptions`](crate::types::DisplayOptions).
pub const PROFILE_OPTIONS_KEY: &str = "soundfaith_embed_profile_options";

/// Persistent key-value settings owned by the host.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;

    fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_get_set_delete() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", json!({ "a": true })).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!({ "a": true })));
        store.delete("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn get_or_falls_back() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_or("k", json!(1)).unwrap(), json!(1));
        store.set("k", json!(2)).unwrap();
        assert_eq!(store.get_or("k", json!(1)).unwrap(), json!(2));
    }

    #[test]
    fn boxed_store_forwards() {
        let mut store: Box<dyn SettingsStore> = Box::new(MemoryStore::new());
        store.set("k", json!(true)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(true)));
        store.delete("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn deleting_missing_key_is_fine() {
        let mut store = MemoryStore::new();
        store.delete("nope").unwrap();
    }
}
