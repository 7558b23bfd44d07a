use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Flat key to decimal-text store for last-used calculator inputs.
pub trait SettingsStore {
    fn get_raw(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: f64) -> Result<(), SettingsError>;

    /// Stores several values as one update. Stores backed by a file override
    /// this to write once.
    fn set_many(&mut self, entries: &[(&str, f64)]) -> Result<(), SettingsError> {
        for &(key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Stored value for `key`, or `default` when the key is absent or the
    /// stored text is not a finite number. A stored zero is returned as zero.
    fn get(&self, key: &str, default: f64) -> f64 {
        let Some(raw) = self.get_raw(key) else {
            return default;
        };
        match parse_stored(&raw) {
            Some(value) => value,
            None => {
                debug!(key, raw = %raw, "stored value is not a number, using default");
                default
            }
        }
    }
}

pub fn parse_stored(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Shortest decimal text for a value: `50.0 -> "50"`, `12.5 -> "12.5"`.
pub fn format_stored(value: f64) -> String {
    value.to_string()
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(mut self, key: &str, raw: &str) -> Self {
        self.values.insert(key.to_string(), raw.to_string());
        self
    }
}

impl SettingsStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: f64) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), format_stored(value));
        Ok(())
    }
}

/// JSON object on disk, rewritten in full on every `set` or `set_many`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file starts empty; an unreadable
    /// or malformed file is logged and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match decode(&text) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "settings file is malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read settings file, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(&self.values)?;
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        // Readers see either the old file or the new one, never a partial write.
        let tmp = self.tmp_path();
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            io_err(source)
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SettingsStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: f64) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), format_stored(value));
        self.flush()
    }

    fn set_many(&mut self, entries: &[(&str, f64)]) -> Result<(), SettingsError> {
        for &(key, value) in entries {
            self.values.insert(key.to_string(), format_stored(value));
        }
        self.flush()
    }
}

// Numbers are accepted alongside strings so a hand-edited file still loads.
fn decode(text: &str) -> Result<BTreeMap<String, String>, serde_json::Error> {
    let raw: BTreeMap<String, Value> = serde_json::from_str(text)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_uses_default() {
        let store = MemoryStore::new();
        assert_eq!(store.get("hourlyRate", 100.0), 100.0);
    }

    #[test]
    fn stored_zero_is_kept() {
        let store = MemoryStore::new().with_raw("equitySwap", "0");
        assert_eq!(store.get("equitySwap", 25.0), 0.0);
    }

    #[test]
    fn unparseable_values_use_default() {
        let store = MemoryStore::new()
            .with_raw("a", "abc")
            .with_raw("b", "")
            .with_raw("c", "NaN")
            .with_raw("d", "inf");
        assert_eq!(store.get("a", 1.0), 1.0);
        assert_eq!(store.get("b", 2.0), 2.0);
        assert_eq!(store.get("c", 3.0), 3.0);
        assert_eq!(store.get("d", 4.0), 4.0);
    }

    #[test]
    fn stored_text_is_shortest_decimal() {
        let mut store = MemoryStore::new();
        store.set("hoursPerWeek", 20.0).expect("memory set");
        store.set("growthRate", 12.5).expect("memory set");
        assert_eq!(store.get_raw("hoursPerWeek").as_deref(), Some("20"));
        assert_eq!(store.get_raw("growthRate").as_deref(), Some("12.5"));
        assert_eq!(store.get("growthRate", 0.0), 12.5);
    }

    #[test]
    fn json_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get("shareValue", 10.0), 10.0);
        store.set("shareValue", 17.25).expect("write settings");
        store.set("equitySwap", 0.0).expect("write settings");

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("shareValue", 10.0), 17.25);
        assert_eq!(reopened.get("equitySwap", 30.0), 0.0);
    }

    #[test]
    fn set_many_writes_every_entry_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");

        let mut store = JsonFileStore::open(&path);
        store
            .set_many(&[("hourlyRate", 120.0), ("shareValue", 2.5), ("equitySwap", 0.0)])
            .expect("write settings");

        let text = fs::read_to_string(&path).expect("settings file written");
        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&text).expect("settings file is json");
        assert_eq!(on_disk.len(), 3);
        assert_eq!(on_disk.get("shareValue").map(String::as_str), Some("2.5"));
        assert!(!store.tmp_path().exists());

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("list tempdir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("settings.json")]);
    }

    #[test]
    fn memory_store_set_many_falls_back_to_set() {
        let mut store = MemoryStore::new();
        store
            .set_many(&[("hoursPerWeek", 40.0), ("growthRate", -2.0)])
            .expect("memory set");
        assert_eq!(store.get_raw("hoursPerWeek").as_deref(), Some("40"));
        assert_eq!(store.get("growthRate", 0.0), -2.0);
    }

    #[test]
    fn malformed_json_store_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").expect("write fixture");

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get_raw("hourlyRate"), None);
        assert_eq!(store.get("hourlyRate", 100.0), 100.0);
    }

    #[test]
    fn json_store_accepts_numeric_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"hourlyRate": 150, "shareValue": "12", "flag": true}"#)
            .expect("write fixture");

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("hourlyRate", 100.0), 150.0);
        assert_eq!(store.get("shareValue", 10.0), 12.0);
        assert_eq!(store.get_raw("flag"), None);
    }
}
