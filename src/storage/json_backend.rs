use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{KeyValueStore, Result};
use crate::utils::paths::{ensure_dir, write_atomic};

const RECORD_EXTENSION: &str = "json";

/// Directory-backed store: every key is one `<key>.json` file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// failed write never leaves a half-written record behind. Bytes that are not
/// UTF-8 are read back lossily so the JSON layer rejects them as corrupt data.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", canonical_key(key), RECORD_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(err) => {
                tracing::warn!(key, path = %path.display(), "record is not valid UTF-8");
                Ok(Some(String::from_utf8_lossy(err.as_bytes()).into_owned()))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key);
        write_atomic(&path, value.as_bytes())?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(key, "record removed");
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "record".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::paths::tmp_path;
    use tempfile::tempdir;

    #[test]
    fn keys_map_to_sanitized_file_names() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(
            store.record_path("splitbite_expenses"),
            dir.path().join("splitbite_expenses.json")
        );
        assert_eq!(
            store.record_path("../escape"),
            dir.path().join("___escape.json")
        );
        assert_eq!(store.record_path("  "), dir.path().join("record.json"));
    }

    #[test]
    fn set_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().to_path_buf()).unwrap();
        store.set("adminLoggedIn", "true").unwrap();
        let path = store.record_path("adminLoggedIn");
        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
        assert_eq!(store.get("adminLoggedIn").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn non_utf8_record_is_returned_lossily() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().to_path_buf()).unwrap();
        fs::write(store.record_path("splitbite_members"), [0xff, 0xfe, b'[']).unwrap();

        let text = store.get("splitbite_members").unwrap().unwrap();
        assert_eq!(text, "\u{fffd}\u{fffd}[");
        assert!(serde_json::from_str::<serde_json::Value>(&text).is_err());
    }
}
