use crate::errors::AppError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{collections::BTreeMap, path::Path};
use tokio::fs;
use tracing::{debug, error};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub date: String,
    pub payload: serde_json::Value,
}

/// Upstream payloads remembered for the rest of the day they were fetched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DayCache {
    pub entries: BTreeMap<String, CacheEntry>,
}

impl DayCache {
    /// Returns the payload stored under `key` if it was fetched on `date`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, date: &str) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.date != date {
            debug!(key, stored = %entry.date, "cache entry is stale");
            return None;
        }
        match serde_json::from_value(entry.payload.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                error!("failed to decode cached {key}: {err}");
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&mut self, key: &str, date: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(payload) => {
                self.entries.insert(
                    key.to_string(),
                    CacheEntry {
                        date: date.to_string(),
                        payload,
                    },
                );
            }
            Err(err) => error!("failed to encode {key} for cache: {err}"),
        }
    }

    /// Drops entries from earlier days.
    pub fn prune(&mut self, date: &str) {
        self.entries.retain(|_, entry| entry.date == date);
    }
}

pub async fn load_cache(path: &Path) -> DayCache {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(cache) => cache,
            Err(err) => {
                error!("failed to parse cache file: {err}");
                DayCache::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => DayCache::default(),
        Err(err) => {
            error!("failed to read cache file: {err}");
            DayCache::default()
        }
    }
}

pub async fn persist_cache(path: &Path, cache: &DayCache) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(cache).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TabsResponse;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("step_brothers_{name}_{}_{nanos}.json", std::process::id()));
        path
    }

    #[test]
    fn entries_only_hit_on_the_same_day() {
        let mut cache = DayCache::default();
        let tabs = TabsResponse {
            tabs: vec!["2025".to_string()],
        };
        cache.insert("tabs", "2026-01-05", &tabs);

        let hit: Option<TabsResponse> = cache.get("tabs", "2026-01-05");
        assert_eq!(hit.unwrap().tabs, vec!["2025".to_string()]);
        assert!(cache.get::<TabsResponse>("tabs", "2026-01-06").is_none());
        assert!(cache.get::<TabsResponse>("missing", "2026-01-05").is_none());
    }

    #[test]
    fn prune_keeps_only_today() {
        let mut cache = DayCache::default();
        cache.insert("a", "2026-01-04", &1u32);
        cache.insert("b", "2026-01-05", &2u32);
        cache.prune("2026-01-05");
        assert_eq!(cache.entries.len(), 1);
        assert!(cache.entries.contains_key("b"));
    }

    #[tokio::test]
    async fn persisted_cache_loads_back() {
        let path = temp_path("roundtrip");
        let mut cache = DayCache::default();
        cache.insert("totals", "2026-01-05", &serde_json::json!({ "totalSteps": 42 }));
        persist_cache(&path, &cache).await.unwrap();

        let loaded = load_cache(&path).await;
        let value: serde_json::Value = loaded.get("totals", "2026-01-05").unwrap();
        assert_eq!(value["totalSteps"], 42);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn unreadable_cache_falls_back_to_empty() {
        let path = temp_path("garbage");
        std::fs::write(&path, b"not json").unwrap();
        assert!(load_cache(&path).await.entries.is_empty());
        let _ = std::fs::remove_file(&path);

        assert!(load_cache(&temp_path("missing")).await.entries.is_empty());
    }
}
