//! HTTP client tests against a local axum fixture

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::FixedOffset;
use lpdash::{
    AppContext, ClientConfig, DashboardClient, DashboardUpdater, DisplayOptions, FetchError,
    MemoryView, SnapshotSource, UpdaterConfig,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;

fn dashboard_payload() -> serde_json::Value {
    json!({
        "total_value": 1234.5,
        "total_fees": -42.315,
        "roi": 7.05,
        "revenue_chart_data": {"labels": ["mon", "tue"], "datasets": [{"data": [1.5, 2.0]}]},
        "recent_transactions": [
            {"timestamp": "2024-01-05T09:03:07Z", "type": "deposit", "amount": 500, "status": "success"},
            {"timestamp": 1704445387000i64, "type": "swap", "amount": 12.345, "status": "failed"}
        ]
    })
}

/// Fixture server with one route prefix per scenario
async fn spawn_fixture() -> SocketAddr {
    let app = Router::new()
        .route("/ok/api/dashboard_data", get(|| async { Json(dashboard_payload()) }))
        .route(
            "/broken/api/dashboard_data",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable") }),
        )
        .route(
            "/empty500/api/dashboard_data",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/garbage/api/dashboard_data",
            get(|| async { "<html>not json</html>" }),
        )
        .route(
            "/partial/api/dashboard_data",
            get(|| async { Json(json!({"total_value": 1, "total_fees": 2})) }),
        )
        .route(
            "/slow/api/dashboard_data",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(dashboard_payload())
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, prefix: &str) -> DashboardClient {
    DashboardClient::new(ClientConfig::new(format!("http://{}/{}", addr, prefix))).unwrap()
}

#[tokio::test]
async fn test_fetch_snapshot_success() {
    let addr = spawn_fixture().await;
    let snapshot = client(addr, "ok").fetch_snapshot().await.unwrap();

    assert_eq!(snapshot.transaction_count(), 2);
    assert!(snapshot.has_chart_data());
    assert!(snapshot.total_investment.is_none());
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let addr = spawn_fixture().await;

    let err = client(addr, "broken").fetch_snapshot().await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 500,
            message: "database unavailable".to_string()
        }
    );

    let err = client(addr, "empty500").fetch_snapshot().await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Status { status: 500, ref message } if message == "Internal Server Error"
    ));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let addr = spawn_fixture().await;
    let err = client(addr, "garbage").fetch_snapshot().await.unwrap_err();
    assert_eq!(err.code(), "PARSE");
}

#[tokio::test]
async fn test_missing_field_is_parse_error() {
    let addr = spawn_fixture().await;
    let err = client(addr, "partial").fetch_snapshot().await.unwrap_err();

    match err {
        FetchError::Parse(message) => assert!(message.contains("roi")),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_route_is_status_error() {
    let addr = spawn_fixture().await;
    let err = client(addr, "nowhere").fetch_snapshot().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_request_timeout() {
    let addr = spawn_fixture().await;
    let mut config = ClientConfig::new(format!("http://{}/slow", addr));
    config.request_timeout_ms = 100;

    let err = DashboardClient::new(config)
        .unwrap()
        .fetch_snapshot()
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::Timeout);
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "ok").fetch_snapshot().await.unwrap_err();
    assert_eq!(err.code(), "UNAVAILABLE");
}

#[tokio::test]
async fn test_fetch_raw_keeps_unknown_fields() {
    let addr = spawn_fixture().await;
    let body = client(addr, "ok").fetch_raw().await.unwrap();
    assert_eq!(body["recent_transactions"][1]["type"], "swap");
}

#[tokio::test]
async fn test_updater_renders_fixture() {
    let addr = spawn_fixture().await;
    let config = UpdaterConfig {
        display: DisplayOptions::with_offset(FixedOffset::east_opt(9 * 3600).unwrap()),
        ..Default::default()
    };
    let updater = DashboardUpdater::new(client(addr, "ok"), MemoryView::new(), AppContext::new(), config);

    assert!(updater.refresh().await.is_applied());

    let view = updater.view();
    let view = view.lock().await;
    let kpis = view.kpis.as_ref().unwrap();
    assert_eq!(kpis.total_value, "$1234.50");
    assert_eq!(kpis.total_fees, "$42.32");
    assert_eq!(kpis.roi, "7.1%");

    let rows = view.rows.as_ref().unwrap();
    assert_eq!(rows[0].timestamp, "2024/1/5 18:03:07");
    assert_eq!(rows[0].amount, "$500.00");
    assert_eq!(rows[1].timestamp, "2024/1/5 18:03:07");
    assert_eq!(rows[1].amount, "$12.35");
    assert_eq!(rows[1].badge.css_class(), "bg-danger");
}
