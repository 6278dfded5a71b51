use crate::achievements::calculate_badges;
use crate::analytics::calculate_personal_analytics;
use crate::api::ApiError;
use crate::cache::persist_cache;
use crate::errors::AppError;
use crate::leaderboard::{build_leaderboard, cumulative_series};
use crate::models::{
    DateRangeQuery, GamificationData, GamificationResponse, ParticipantAnalyticsResponse,
    StepDataResponse, StepsQuery, TabsResponse, TotalsResponse,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use tracing::{debug, error, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let date = today_string();
    match load_gamification(&state).await {
        Ok(view) => Html(render_index(&date, Ok(&view))),
        Err(err) => {
            error!("failed to load dashboard: {}", err.message);
            Html(render_index(&date, Err(err.message.as_str())))
        }
    }
}

pub async fn get_steps(
    State(state): State<AppState>,
    Query(query): Query<StepsQuery>,
) -> Result<Json<StepDataResponse>, AppError> {
    let tab = query.tab.as_deref().map(str::trim).unwrap_or_default();
    if tab.is_empty() {
        return Err(AppError::bad_request("tab is required"));
    }

    let key = match query.year {
        Some(year) => format!("steps:{tab}:{year}"),
        None => format!("steps:{tab}"),
    };
    let data = cached(&state, &key, || state.api.step_data(tab, query.year)).await?;
    Ok(Json(data))
}

pub async fn get_totals(State(state): State<AppState>) -> Result<Json<TotalsResponse>, AppError> {
    let totals = cached(&state, "totals", || state.api.totals()).await?;
    Ok(Json(totals))
}

pub async fn get_gamification(
    State(state): State<AppState>,
) -> Result<Json<GamificationResponse>, AppError> {
    Ok(Json(load_gamification(&state).await?))
}

pub async fn get_participant(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<ParticipantAnalyticsResponse>, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("participant name is required"));
    }
    if let (Some(start), Some(end)) = (range.start_date, range.end_date) {
        if start > end {
            return Err(AppError::bad_request("start_date must not be after end_date"));
        }
    }

    let participant = state.api.participant(name, &range).await?;
    let analytics = calculate_personal_analytics(&participant.daily_steps);
    Ok(Json(ParticipantAnalyticsResponse {
        participant,
        analytics,
    }))
}

pub async fn get_tabs(State(state): State<AppState>) -> Result<Json<TabsResponse>, AppError> {
    Ok(Json(state.api.tabs().await?))
}

async fn load_gamification(state: &AppState) -> Result<GamificationResponse, AppError> {
    let data: GamificationData = cached(state, "gamification", || state.api.gamification()).await?;
    Ok(build_gamification(&data, state.season_start))
}

pub fn build_gamification(
    data: &GamificationData,
    season_start: Option<NaiveDate>,
) -> GamificationResponse {
    GamificationResponse {
        leaderboard: build_leaderboard(&data.participants),
        cumulative: cumulative_series(&data.participants),
        badges: calculate_badges(&data.participants, season_start),
    }
}

/// Serves `key` from today's cache entry, falling back to `fetch`. Cache
/// failures are logged and never reach the caller.
async fn cached<T, F, Fut>(state: &AppState, key: &str, fetch: F) -> Result<T, AppError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let date = today_string();
    if state.cache_enabled {
        if let Some(hit) = state.cache.lock().await.get::<T>(key, &date) {
            debug!(key, "cache hit");
            return Ok(hit);
        }
        debug!(key, "cache miss");
    }

    let value = fetch().await?;

    if state.cache_enabled {
        let _writer = state.cache_writer.lock().await;
        let snapshot = {
            let mut cache = state.cache.lock().await;
            cache.prune(&date);
            cache.insert(key, &date, &value);
            cache.clone()
        };
        if let Err(err) = persist_cache(&state.cache_path, &snapshot).await {
            warn!("failed to persist cache: {}", err.message);
        }
    }

    Ok(value)
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
