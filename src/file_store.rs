use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::storage::SettingsStore;

/// Settings persisted as a TOML document, one table per key.
///
/// The whole file is loaded on open and rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStore {
    /// Open `path`, or the default settings file when `None`. A missing
    /// file is an empty store; it is created on first write.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_settings_path()?,
        };
        let entries: BTreeMap<String, Value> = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings file: {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parsing settings file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened settings file");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path { &self.path }

    // Writes `entries` to disk; callers commit them to `self.entries` only on success.
    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating settings dir: {}", parent.display()))?;
            }
        }
        let text = toml::to_string_pretty(entries).context("serializing settings")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing settings file: {}", self.path.display()))
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }
}

/// `<config dir>/settings.toml` for this application.
pub fn default_settings_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "soundfaith", "soundfaith-embed")
        .context("unable to determine config directory for default settings path")?;
    Ok(proj.config_dir().join("settings.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(Some(&tmp.path().join("settings.toml"))).unwrap();
        assert!(store.get("anything").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn writes_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("settings.toml");
        let mut store = FileStore::open(Some(&path)).unwrap();
        store
            .set("soundfaith_embed_sermon_options", json!({ "includeSermonDetails": false }))
            .unwrap();

        let reopened = FileStore::open(Some(&path)).unwrap();
        assert_eq!(
            reopened.get("soundfaith_embed_sermon_options").unwrap(),
            Some(json!({ "includeSermonDetails": false }))
        );
    }

    #[test]
    fn delete_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        let mut store = FileStore::open(Some(&path)).unwrap();
        store.set("a", json!({ "x": true })).unwrap();
        store.set("b", json!({ "y": false })).unwrap();
        store.delete("a").unwrap();

        let reopened = FileStore::open(Some(&path)).unwrap();
        assert!(reopened.get("a").unwrap().is_none());
        assert_eq!(reopened.get("b").unwrap(), Some(json!({ "y": false })));
    }

    #[test]
    fn reads_hand_written_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(
            &path,
            "[soundfaith_embed_profile_options]\nincludePlaylist = false\nincludeSpeaker = \"true\"\n",
        )
        .unwrap();
        let store = FileStore::open(Some(&path)).unwrap();
        assert_eq!(
            store.get("soundfaith_embed_profile_options").unwrap(),
            Some(json!({ "includePlaylist": false, "includeSpeaker": "true" }))
        );
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("conf");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("settings.toml");
        let mut store = FileStore::open(Some(&path)).unwrap();

        assert!(store.set("k", json!({ "a": true })).is_err());
        assert!(store.get("k").unwrap().is_none());

        std::fs::remove_file(&blocker).unwrap();
        store
            .set("soundfaith_embed_sermon_options", json!({ "includeSermonDetails": true }))
            .unwrap();
        let reopened = FileStore::open(Some(&path)).unwrap();
        assert!(reopened.get("k").unwrap().is_none());
        assert_eq!(
            reopened.get("soundfaith_embed_sermon_options").unwrap(),
            Some(json!({ "includeSermonDetails": true }))
        );
    }

    #[test]
    fn failed_delete_keeps_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("conf");
        let path = dir.join("settings.toml");
        let mut store = FileStore::open(Some(&path)).unwrap();
        store.set("a", json!({ "x": true })).unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::write(&dir, b"not a directory").unwrap();
        assert!(store.delete("a").is_err());
        assert_eq!(store.get("a").unwrap(), Some(json!({ "x": true })));
    }

    #[test]
    fn garbage_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(FileStore::open(Some(&path)).is_err());
    }
}
