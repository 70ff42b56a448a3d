mod common;

use axum::http::StatusCode;
use recpanel::{
    stats::{DiskStatsView, Timestamp},
    ControlApi, HttpControlApi, Panel, PanelError, RecordAction,
};
use std::{sync::Arc, time::Duration};

#[tokio::test]
async fn record_commands_post_form_actions() {
    let recorder = common::FakeRecorder::new();
    let url = common::serve(recorder.clone()).await;
    let api = HttpControlApi::new(&url, None).expect("client");

    assert_eq!(api.record(RecordAction::Start).await.expect("start"), "Recording...");
    assert_eq!(api.record(RecordAction::Stop).await.expect("stop"), "Not Recording..");
    assert_eq!(
        *recorder.record_requests.lock().unwrap(),
        vec!["start".to_string(), "stop".to_string()]
    );
}

#[tokio::test]
async fn delete_posts_day_count() {
    let recorder = common::FakeRecorder::new();
    let url = common::serve(recorder.clone()).await;
    let panel = Panel::new(Arc::new(HttpControlApi::new(&url, None).expect("client")));

    panel.send_delete_command("14").await.expect("delete");
    assert_eq!(panel.snapshot().cleanup_status, "Status: 3 Files Deleted");
    assert!(panel.delete_enabled());

    panel.send_delete_command("fourteen").await.unwrap_err();
    assert_eq!(*recorder.delete_requests.lock().unwrap(), vec!["14".to_string()]);
}

#[tokio::test]
async fn statistics_drive_the_panel() {
    let recorder = common::FakeRecorder::new();
    let url = common::serve(recorder.clone()).await;
    let panel = Panel::new(Arc::new(HttpControlApi::new(&url, None).expect("client")));

    let state = panel.fetch_disk_statistics().await.expect("stats");
    assert_eq!(state.server_start, Timestamp::At(common::SERVER_START));
    assert_eq!(state.recording_start, Timestamp::Unset);
    let view = panel.snapshot();
    assert_eq!(
        view.disk_stats.lines(),
        vec![
            "Total Space: 1000 B",
            "Free Space: 250 B",
            "Usable Space: 900 B",
            "Space Used: 75% (750 B)",
        ]
    );
    let uptimes = panel.update_uptimes_display(common::SERVER_START + 3_661_000);
    assert_eq!(uptimes.server_uptime, "1 h 1 m 1 s");
    assert_eq!(uptimes.recording_uptime, "Idle");

    panel.send_action(RecordAction::Start).await.expect("start");
    panel.fetch_disk_statistics().await.expect("stats");
    let uptimes = panel.update_uptimes_display(common::SERVER_START + 120_000);
    assert_eq!(uptimes.recording_uptime, "1 m");
    let view = panel.snapshot();
    assert_eq!(view.recording_indicator, "Status: Recording");
    assert_eq!(view.recording_status, "Status: Recording...");
}

#[tokio::test]
async fn statistics_http_errors_are_rendered() {
    let recorder = common::FakeRecorder::new();
    *recorder.statistics_status.lock().unwrap() = StatusCode::INTERNAL_SERVER_ERROR;
    let url = common::serve(recorder).await;
    let panel = Panel::new(Arc::new(HttpControlApi::new(&url, None).expect("client")));

    let err = panel.fetch_disk_statistics().await.unwrap_err();
    assert!(matches!(err, PanelError::Http { status: 500, .. }));
    assert_eq!(
        panel.snapshot().disk_stats,
        DiskStatsView::Error("Error loading disk statistics: HTTP error! Status: 500".into())
    );
}

#[tokio::test]
async fn unknown_routes_surface_status_and_body() {
    let recorder = common::FakeRecorder::new();
    let url = common::serve(recorder).await;
    let api = HttpControlApi::new(&format!("{url}/missing"), None).expect("client");
    let err = api.record(RecordAction::Start).await.unwrap_err();
    assert!(matches!(err, PanelError::Http { status: 404, .. }));
}

#[tokio::test]
async fn unreachable_recorder_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpControlApi::new(&format!("http://{addr}"), Some(Duration::from_secs(5)))
        .expect("client");
    let panel = Panel::new(Arc::new(api));
    let err = panel.send_delete_command("7").await.unwrap_err();
    assert!(matches!(err, PanelError::Network(_)));
    assert!(panel
        .snapshot()
        .cleanup_status
        .starts_with("Status: Network Error - "));
    assert!(panel.delete_enabled());
}

#[tokio::test]
async fn slow_recorder_hits_the_request_timeout() {
    let recorder = common::FakeRecorder::new();
    *recorder.record_delay.lock().unwrap() = Duration::from_secs(5);
    let url = common::serve(recorder.clone()).await;
    let api = HttpControlApi::new(&url, Some(Duration::from_millis(200))).expect("client");
    let panel = Panel::new(Arc::new(api));

    let err = tokio::time::timeout(Duration::from_secs(3), panel.send_action(RecordAction::Start))
        .await
        .expect("request deadline fired before the server replied")
        .unwrap_err();
    assert!(matches!(err, PanelError::Network(_)));
    assert!(panel
        .snapshot()
        .recording_status
        .starts_with("Status: Network Error - "));
    assert!(panel.record_enabled());
    assert_eq!(*recorder.record_requests.lock().unwrap(), vec!["start".to_string()]);
}

#[tokio::test]
async fn delete_control_is_reenabled_after_http_error() {
    let recorder = common::FakeRecorder::new();
    let url = common::serve(recorder.clone()).await;
    let api = HttpControlApi::new(&format!("{url}/missing"), None).expect("client");
    let panel = Panel::new(Arc::new(api));

    let err = panel.send_delete_command("7").await.unwrap_err();
    assert!(matches!(err, PanelError::Http { status: 404, .. }));
    assert!(panel.snapshot().cleanup_status.starts_with("Status: Error (404) - "));
    assert!(panel.delete_enabled());
    assert!(recorder.delete_requests.lock().unwrap().is_empty());
}
