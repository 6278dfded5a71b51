use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::{Duration, Instant};
use tokio::time::sleep;

static GAMIFICATION: Lazy<Value> = Lazy::new(|| {
    json!({
        "participants": [
            {
                "name": "alex",
                "totalSteps": 32321,
                "averageSteps": 10773.7,
                "highestSingleDay": 12321,
                "dailySteps": [10000, 10000, 12321],
                "currentWinStreak": 1,
                "bestWinStreak": 2,
                "currentLosingStreak": 0,
                "allTimeWins": 2
            },
            {
                "name": "brennan",
                "totalSteps": 34000,
                "averageSteps": 11333.3,
                "highestSingleDay": 26000,
                "dailySteps": [8000, 26000, 0],
                "currentWinStreak": 0,
                "bestWinStreak": 1,
                "currentLosingStreak": 1,
                "allTimeWins": 1
            }
        ]
    })
});

#[derive(Clone)]
struct Upstream {
    healthy: bool,
    gamification_calls: Arc<AtomicUsize>,
}

async fn upstream_gamification(State(upstream): State<Upstream>) -> Response {
    upstream.gamification_calls.fetch_add(1, Ordering::SeqCst);
    if !upstream.healthy {
        return (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance").into_response();
    }
    Json(GAMIFICATION.clone()).into_response()
}

async fn upstream_totals(State(upstream): State<Upstream>) -> Response {
    if !upstream.healthy {
        return (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance").into_response();
    }
    Json(json!({ "totalSteps": 66321, "totalDays": 3, "participants": [] })).into_response()
}

async fn upstream_participant(Path(name): Path<String>) -> Response {
    let participants = GAMIFICATION["participants"].as_array().cloned().unwrap_or_default();
    match participants.into_iter().find(|p| p["name"] == name.as_str()) {
        Some(participant) => Json(participant).into_response(),
        None => (StatusCode::NOT_FOUND, "no such participant").into_response(),
    }
}

async fn spawn_upstream(healthy: bool) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/api/gamification", get(upstream_gamification))
        .route("/api/totals", get(upstream_totals))
        .route("/api/participants/:name", get(upstream_participant))
        .with_state(Upstream {
            healthy,
            gamification_calls: Arc::clone(&calls),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}/api"), calls)
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_cache_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("step_brothers_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(upstream_url: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_step_brothers"))
        .env("PORT", port.to_string())
        .env("API_BASE_URL", upstream_url)
        .env("API_RETRIES", "1")
        .env("API_RETRY_DELAY_MS", "10")
        .env("API_TIMEOUT_MS", "2000")
        .env("APP_CACHE_PATH", unique_cache_path())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

fn find_badge<'a>(badges: &'a [Value], id: &str) -> &'a Value {
    badges
        .iter()
        .find(|badge| badge["id"] == id)
        .unwrap_or_else(|| panic!("missing badge {id}"))
}

#[tokio::test]
async fn http_gamification_ranks_and_awards_badges() {
    let (upstream, _) = spawn_upstream(true).await;
    let server = spawn_server(&upstream).await;

    let body: Value = Client::new()
        .get(format!("{}/api/gamification", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["leaderboard"][0]["name"], "brennan");
    assert_eq!(body["leaderboard"][1]["rank"], 2);
    assert_eq!(body["cumulative"].as_array().unwrap().len(), 3);

    let badges = body["badges"].as_array().unwrap();
    let round = find_badge(badges, "round_number");
    assert_eq!(round["earnedBy"], "alex");
    assert_eq!(round["dayIndex"], 0);
    assert_eq!(find_badge(badges, "back_to_back")["dayIndex"], 1);
    assert_eq!(find_badge(badges, "marathon")["earnedBy"], "brennan");
    assert_eq!(find_badge(badges, "lowest_day")["earnedBy"], "brennan");
    assert_eq!(find_badge(badges, "palindrome")["value"], 12321);
    assert_eq!(find_badge(badges, "step_king")["earnedBy"], "brennan");
    assert_eq!(find_badge(badges, "streak_lord")["earnedBy"], "alex");
}

#[tokio::test]
async fn http_gamification_is_cached_for_the_day() {
    let (upstream, calls) = spawn_upstream(true).await;
    let server = spawn_server(&upstream).await;
    let client = Client::new();
    let before = calls.load(Ordering::SeqCst);

    for _ in 0..3 {
        let response = client
            .get(format!("{}/api/gamification", server.base_url))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    // the readiness probe may already have filled the cache
    assert!(calls.load(Ordering::SeqCst) - before <= 1);
}

#[tokio::test]
async fn http_participant_includes_analytics() {
    let (upstream, _) = spawn_upstream(true).await;
    let server = spawn_server(&upstream).await;

    let body: Value = Client::new()
        .get(format!(
            "{}/api/participants/alex?start_date=2026-01-01",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["participant"]["name"], "alex");
    assert_eq!(body["analytics"]["currentStreak"], 3);
    assert_eq!(body["analytics"]["totalSteps"], 32321);
    assert_eq!(body["analytics"]["bestDay"]["steps"], 12321);
    assert!(!body["analytics"]["insights"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn http_rejects_bad_input() {
    let (upstream, _) = spawn_upstream(true).await;
    let server = spawn_server(&upstream).await;
    let client = Client::new();

    let missing_tab = client
        .get(format!("{}/api/steps", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_tab.status(), reqwest::StatusCode::BAD_REQUEST);

    let backwards = client
        .get(format!(
            "{}/api/participants/alex?start_date=2026-02-01&end_date=2026-01-01",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(backwards.status(), reqwest::StatusCode::BAD_REQUEST);

    let unknown = client
        .get(format!("{}/api/participants/nobody", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_upstream_failure_surfaces_inline() {
    let (upstream, _) = spawn_upstream(false).await;
    let server = spawn_server(&upstream).await;
    let client = Client::new();

    let totals = client
        .get(format!("{}/api/totals", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(totals.status(), reqwest::StatusCode::BAD_GATEWAY);
    assert!(totals.text().await.unwrap().contains("503"));

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(page.status().is_success());
    let html = page.text().await.unwrap();
    assert!(html.contains(r#"role="alert""#));
    assert!(html.contains("down for maintenance"));
}

#[tokio::test]
async fn http_dashboard_renders_leaderboard() {
    let (upstream, _) = spawn_upstream(true).await;
    let server = spawn_server(&upstream).await;

    let html = Client::new()
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Step Brothers"));
    assert!(html.contains("brennan"));
    assert!(html.contains("34,000"));
    assert!(html.contains("Marathoner"));
}
