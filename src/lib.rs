pub mod achievements;
pub mod analytics;
pub mod api;
pub mod app;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod state;
pub mod ui;

pub use app::router;
pub use cache::load_cache;
pub use config::Config;
pub use state::AppState;
