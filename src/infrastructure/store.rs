//! Key-value store implementations

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::infrastructure::traits::KeyValueStore;

/// One pretty-printed `<key>.json` file per key under a root directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid store key '{key}'"),
            ));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

/// Parse without serde_json's nesting limit; degenerate trees nest one
/// object per node.
fn parse_unbounded(content: &str) -> serde_json::Result<serde_json::Value> {
    let mut de = serde_json::Deserializer::from_str(content);
    de.disable_recursion_limit();
    let value = serde_json::Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

impl KeyValueStore for JsonFileStore {
    #[instrument(level = "debug", skip(self))]
    fn get(&self, key: &str) -> io::Result<Option<serde_json::Value>> {
        let path = self.path_for(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let value =
            parse_unbounded(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(value))
    }

    #[instrument(level = "debug", skip(self, value))]
    fn set(&self, key: &str, value: &serde_json::Value) -> io::Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        // write-then-rename so a crash never leaves a truncated file behind
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        debug!("set: wrote {}", path.display());
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn delete(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Process-local store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, serde_json::Value>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<serde_json::Value>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &serde_json::Value) -> io::Result<()> {
        self.lock().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> io::Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn given_missing_key_when_getting_then_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("store"));
        assert!(store.get("ds_sessions").unwrap().is_none());
    }

    #[test]
    fn given_value_when_set_then_file_written_and_readable() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("store"));

        store.set("ds_current_state", &json!({"array": [1, "a"]})).unwrap();

        assert!(dir.path().join("store/ds_current_state.json").exists());
        assert_eq!(
            store.get("ds_current_state").unwrap(),
            Some(json!({"array": [1, "a"]}))
        );
    }

    #[test]
    fn given_path_like_key_when_setting_then_rejected() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.set("../escape", &json!(1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn given_corrupt_file_when_getting_then_invalid_data() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.get("broken").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn given_nesting_past_default_limit_when_getting_then_parsed() {
        let dir = TempDir::new().unwrap();
        let depth = 1000;
        let content = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
        fs::write(dir.path().join("deep.json"), content).unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut value = &store.get("deep").unwrap().unwrap();
        let mut levels = 0;
        while let Some(inner) = value.as_array().and_then(|a| a.first()) {
            value = inner;
            levels += 1;
        }

        assert_eq!(levels, depth);
        assert_eq!(value, &json!(1));
    }

    #[test]
    fn given_trailing_garbage_when_getting_then_invalid_data() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("trailing.json"), "{} {}").unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.get("trailing").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn given_absent_key_when_deleting_then_ok() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.delete("nothing").is_ok());

        let memory = MemoryStore::new();
        memory.set("k", &json!(true)).unwrap();
        memory.delete("k").unwrap();
        assert!(memory.get("k").unwrap().is_none());
    }
}
