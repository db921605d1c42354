use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use super::{KeyValueStore, StorageError};
use crate::models::Rocket;

/// Storage key holding the JSON array of locally created rockets.
pub const LOCAL_ROCKETS_KEY: &str = "customRockets";

/// Key an unparseable `customRockets` value is moved to before it is
/// replaced.
pub const LOCAL_ROCKETS_BACKUP_KEY: &str = "customRockets.bak";

/// The persisted list as raw JSON entries.
///
/// Entries that no longer decode as a `Rocket` are kept as-is, so a rewrite
/// never drops records this version cannot read.
#[derive(Debug, Default)]
pub struct StoredRockets {
    entries: Vec<Value>,
}

impl StoredRockets {
    /// Entries that decode as a `Rocket`, in stored order.
    pub fn rockets(&self) -> Vec<Rocket> {
        self.entries
            .iter()
            .filter_map(|entry| match serde_json::from_value::<Rocket>(entry.clone()) {
                Ok(rocket) => Some(rocket),
                Err(e) => {
                    warn!(id = ?entry_id(entry), error = %e, "Skipping unreadable local rocket");
                    None
                }
            })
            .collect()
    }

    pub fn prepend(&mut self, rocket: &Rocket) -> Result<(), StorageError> {
        let entry = serde_json::to_value(rocket).map_err(|source| StorageError::Encode {
            key: LOCAL_ROCKETS_KEY.to_string(),
            source,
        })?;
        self.entries.insert(0, entry);
        Ok(())
    }

    /// Drop every entry with `id`, readable or not. Returns how many went.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry_id(entry) != Some(id));
        before - self.entries.len()
    }
}

fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

/// Typed access to the locally created rockets.
///
/// Reads are lenient: an absent key or a value that is not a JSON array
/// reads as an empty list, and single unreadable entries are skipped.
#[derive(Clone)]
pub struct LocalRockets {
    storage: Arc<dyn KeyValueStore>,
}

impl LocalRockets {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Raw entries, or `None` when the stored value is not a JSON array.
    fn read_raw(&self) -> Result<(Option<String>, Option<Vec<Value>>), StorageError> {
        let contents = self.storage.get(LOCAL_ROCKETS_KEY)?;
        let entries = match contents.as_deref() {
            None => Some(Vec::new()),
            Some(text) => match serde_json::from_str::<Vec<Value>>(text) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    warn!(key = LOCAL_ROCKETS_KEY, error = %e, "Local rockets are not a JSON array");
                    None
                }
            },
        };
        Ok((contents, entries))
    }

    /// Read the list, treating any failure as empty.
    pub fn load(&self) -> Vec<Rocket> {
        match self.read_raw() {
            Ok((_, Some(entries))) => StoredRockets { entries }.rockets(),
            Ok((_, None)) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read local rockets");
                Vec::new()
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<Rocket> {
        self.load().into_iter().find(|r| r.id == id)
    }

    /// Read, modify and write back the persisted list.
    ///
    /// Read failures are returned without writing. A value that is not a
    /// JSON array is copied to `LOCAL_ROCKETS_BACKUP_KEY` first and the
    /// update starts from an empty list.
    pub fn update<T>(
        &self,
        f: impl FnOnce(&mut StoredRockets) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let (contents, entries) = self.read_raw()?;
        let entries = match (entries, contents) {
            (Some(entries), _) => entries,
            (None, Some(corrupt)) => {
                self.storage.set(LOCAL_ROCKETS_BACKUP_KEY, &corrupt)?;
                warn!(backup = LOCAL_ROCKETS_BACKUP_KEY, "Backed up unreadable local rockets");
                Vec::new()
            }
            (None, None) => Vec::new(),
        };

        let mut stored = StoredRockets { entries };
        let result = f(&mut stored)?;

        let contents =
            serde_json::to_string(&stored.entries).map_err(|source| StorageError::Encode {
                key: LOCAL_ROCKETS_KEY.to_string(),
                source,
            })?;
        self.storage.set(LOCAL_ROCKETS_KEY, &contents)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn local(id: &str) -> Rocket {
        let mut rocket = Rocket::new(id, format!("Local {}", id), "US", 1.0, true);
        rocket.is_local = true;
        rocket
    }

    const PARTLY_BROKEN: &str = r#"[
        {"id": "a", "name": "Good", "country": "US", "cost_per_launch": 5, "active": true, "isLocal": true},
        {"id": "b", "name": "Broken", "country": "US", "cost_per_launch": null, "active": true, "isLocal": true}
    ]"#;

    #[test]
    fn test_absent_key_reads_empty() {
        let rockets = LocalRockets::new(Arc::new(MemoryStore::new()));
        assert!(rockets.load().is_empty());
        assert!(rockets.find("a").is_none());
    }

    #[test]
    fn test_malformed_value_reads_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(LOCAL_ROCKETS_KEY, "{not json").unwrap();

        let rockets = LocalRockets::new(storage.clone());
        assert!(rockets.load().is_empty());

        // Wrong shape is treated the same way
        storage.set(LOCAL_ROCKETS_KEY, r#"{"id": "a"}"#).unwrap();
        assert!(rockets.load().is_empty());
    }

    #[test]
    fn test_unreadable_entry_is_skipped_on_load() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(LOCAL_ROCKETS_KEY, PARTLY_BROKEN).unwrap();

        let rockets = LocalRockets::new(storage);
        let loaded = rockets.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "a");
        assert!(rockets.find("b").is_none());
    }

    #[test]
    fn test_update_keeps_unreadable_entries() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(LOCAL_ROCKETS_KEY, PARTLY_BROKEN).unwrap();
        let rockets = LocalRockets::new(storage.clone());

        rockets.update(|stored| stored.prepend(&local("c"))).unwrap();

        let raw: Vec<Value> =
            serde_json::from_str(&storage.get(LOCAL_ROCKETS_KEY).unwrap().unwrap()).unwrap();
        let ids: Vec<&str> = raw.iter().filter_map(entry_id).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert!(raw[2]["cost_per_launch"].is_null());
    }

    #[test]
    fn test_update_removes_unreadable_entry_by_id() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(LOCAL_ROCKETS_KEY, PARTLY_BROKEN).unwrap();
        let rockets = LocalRockets::new(storage.clone());

        let removed = rockets.update(|stored| Ok(stored.remove("b"))).unwrap();

        assert_eq!(removed, 1);
        let raw = storage.get(LOCAL_ROCKETS_KEY).unwrap().unwrap();
        assert!(!raw.contains("Broken"));
        assert_eq!(rockets.load().len(), 1);
    }

    #[test]
    fn test_update_backs_up_corrupt_value() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(LOCAL_ROCKETS_KEY, "{not json").unwrap();
        let rockets = LocalRockets::new(storage.clone());

        rockets.update(|stored| stored.prepend(&local("a"))).unwrap();

        assert_eq!(
            storage.get(LOCAL_ROCKETS_BACKUP_KEY).unwrap().as_deref(),
            Some("{not json")
        );
        assert_eq!(rockets.load(), vec![local("a")]);
    }

    #[test]
    fn test_update_writes_camel_case_array() {
        let storage = Arc::new(MemoryStore::new());
        let rockets = LocalRockets::new(storage.clone());

        rockets
            .update(|stored| {
                stored.prepend(&local("b"))?;
                stored.prepend(&local("a"))
            })
            .unwrap();

        let raw = storage.get(LOCAL_ROCKETS_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"isLocal\":true"));
        assert_eq!(rockets.find("b").unwrap().name, "Local b");
        assert_eq!(rockets.load().len(), 2);
    }
}
