use crate::api::ApiClient;
use crate::cache::DayCache;
use crate::config::Config;
use chrono::NaiveDate;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub cache_path: PathBuf,
    pub cache_enabled: bool,
    pub season_start: Option<NaiveDate>,
    pub cache: Arc<Mutex<DayCache>>,
    /// Serializes cache file writes without holding `cache`.
    pub cache_writer: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: &Config, cache: DayCache) -> Self {
        Self {
            api: ApiClient::new(config.api.clone()),
            cache_path: config.cache_path.clone(),
            cache_enabled: config.cache_enabled,
            season_start: config.season_start,
            cache: Arc::new(Mutex::new(cache)),
            cache_writer: Arc::new(Mutex::new(())),
        }
    }
}
