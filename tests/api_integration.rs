//! End-to-end tests of the HTTP API against a running countdown

use std::{sync::Arc, time::Duration};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use how_much_longer::{
    countdown::{CountdownEngine, CountdownEvent, ManualClock, Milestone},
    create_router,
    services::{FileSettingsStore, SettingsStore},
    AppState, Settings,
};

fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 14)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

struct Harness {
    _dir: TempDir,
    store: FileSettingsStore,
    clock: ManualClock,
    state: Arc<AppState>,
    app: Router,
}

fn harness(now: NaiveDateTime) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSettingsStore::with_path(dir.path().join("settings.json"));
    let clock = ManualClock::new(now);
    let engine = CountdownEngine::new(store.load(), Box::new(clock.clone()));
    let state = Arc::new(AppState::new(engine, Arc::new(store.clone()), Duration::from_secs(1)));
    let app = create_router(Arc::clone(&state));
    Harness { _dir: dir, store, clock, state, app }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test(start_paused = true)]
async fn countdown_is_unavailable_until_first_tick() {
    let h = harness(at(16, 0, 0));
    let (status, _) = call(&h.app, Method::GET, "/countdown", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test(start_paused = true)]
async fn start_tick_and_read_countdown() {
    let h = harness(at(16, 0, 0));
    let mut watch = h.state.watch_state();

    let (status, body) = call(&h.app, Method::POST, "/countdown/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], true);
    assert_eq!(body["changed"], true);

    watch.changed().await.unwrap();
    let (status, body) = call(&h.app, Method::GET, "/countdown", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formatted_time"], "01:00:00");
    assert_eq!(body["total_minutes_remaining"], 60);
    assert_eq!(body["time_remaining_seconds"], 3600);
    assert_eq!(body["is_workday_over"], false);
    assert_eq!(body["status_message"], "Time until end of workday");
    assert_eq!(body["running"], true);

    let (_, body) = call(&h.app, Method::POST, "/countdown/start", None).await;
    assert_eq!(body["changed"], false);

    let (status, body) = call(&h.app, Method::POST, "/countdown/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], false);
    assert_eq!(body["changed"], true);
}

#[tokio::test(start_paused = true)]
async fn put_settings_saves_and_resets_milestones() {
    let h = harness(at(16, 44, 1));
    let mut events = h.state.subscribe();
    h.state.start_countdown().unwrap();

    let fifteen = |event: &CountdownEvent| {
        *event == CountdownEvent::Milestone(Milestone::FifteenMinutesLeft)
    };

    tokio::time::sleep(Duration::from_millis(500)).await;
    let mut seen = 0;
    while let Ok(event) = events.try_recv() {
        if fifteen(&event) {
            seen += 1;
        }
    }
    assert_eq!(seen, 1);

    let (status, body) = call(
        &h.app,
        Method::PUT,
        "/settings",
        Some(json!({
            "endHour": 17,
            "endMinute": 0,
            "startHour": 8,
            "startMinute": 30,
            "enableHourlyNotifications": false,
            "enableMilestoneNotifications": true,
            "minimizeToTrayOnClose": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["workDuration"], "08:30:00");

    let saved = h.store.load();
    assert_eq!(saved.end_of_workday, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    assert!(!saved.enable_hourly_notifications);
    assert!(!saved.minimize_to_tray_on_close);

    // Gate was reset, so the same milestone fires again on the next tick.
    h.clock.advance(chrono::TimeDelta::seconds(1));
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let mut seen = 0;
    while let Ok(event) = events.try_recv() {
        if fifteen(&event) {
            seen += 1;
        }
    }
    assert_eq!(seen, 1);

    h.state.stop_countdown().unwrap();
}

#[tokio::test]
async fn put_settings_rejects_invalid_hours() {
    let h = harness(at(9, 0, 0));
    let (status, _) = call(
        &h.app,
        Method::PUT,
        "/settings",
        Some(json!({
            "endHour": 25,
            "endMinute": 0,
            "startHour": 9,
            "startMinute": 0,
            "enableHourlyNotifications": true,
            "enableMilestoneNotifications": true,
            "minimizeToTrayOnClose": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(h.state.settings().unwrap(), Settings::default());
}

#[tokio::test]
async fn reload_picks_up_edited_file() {
    let h = harness(at(9, 0, 0));
    let edited = Settings {
        end_of_workday: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
        ..Settings::default()
    };
    h.store.save(&edited).unwrap();

    let (status, body) = call(&h.app, Method::GET, "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endOfWorkday"], "17:00:00");

    let (status, body) = call(&h.app, Method::POST, "/settings/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endOfWorkday"], "15:30:00");
    assert_eq!(h.state.settings().unwrap(), edited);
}

#[tokio::test]
async fn health_reports_version() {
    let h = harness(at(9, 0, 0));
    let (status, body) = call(&h.app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
