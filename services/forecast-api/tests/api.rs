//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use forecast_api::build_router;
use forecast_api::state::AppState;
use forecast_grid::ForecastConfig;
use test_utils::{create_constant_grid, create_test_grid, forecast_dir, grid, time};

async fn app_for(dir: &TempDir) -> (Router, Arc<AppState>) {
    let config = ForecastConfig {
        data_dir: dir.path().to_path_buf(),
        ..ForecastConfig::default()
    };
    let state = Arc::new(AppState::new(config).await.unwrap());
    (build_router(Arc::clone(&state)), state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn hourly_dir() -> TempDir {
    let layout = grid::CENTRAL_EUROPE;
    forecast_dir(&layout, &time::HOURLY, |ts| {
        let mut values = create_constant_grid(layout.width(), layout.height(), 0.0);
        values[60] = (ts - time::HOURLY[0]) as f32 / 3600.0 + 20.5;
        values
    })
    .unwrap()
}

#[tokio::test]
async fn test_get_forecast_returns_values_by_timestamp() {
    let dir = hourly_dir();
    let (app, _) = app_for(&dir).await;

    let uri = format!(
        "/getForecast?from_ts={}&to_ts={}&lat=55.0&lon=15.0",
        time::HOURLY[1],
        time::HOURLY[3]
    );
    let (status, body) = get(app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(body[time::HOURLY[1].to_string()], 21.5);
    assert_eq!(body[time::HOURLY[2].to_string()], 22.5);
    assert_eq!(body[time::HOURLY[3].to_string()], 23.5);
}

#[tokio::test]
async fn test_get_forecast_keys_are_ascending() {
    let dir = hourly_dir();
    let (app, _) = app_for(&dir).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/getForecast?from_ts=0&to_ts=9999999999&lat=55&lon=15")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let positions: Vec<usize> = time::HOURLY
        .iter()
        .map(|ts| text.find(&format!("\"{ts}\"")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_get_forecast_outside_grid_is_empty_object() {
    let dir = hourly_dir();
    let (app, _) = app_for(&dir).await;

    let (status, body) = get(app, "/getForecast?from_ts=0&to_ts=9999999999&lat=-33.9&lon=151.2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn test_get_forecast_reversed_range_is_empty_object() {
    let dir = hourly_dir();
    let (app, _) = app_for(&dir).await;

    let uri = format!(
        "/getForecast?from_ts={}&to_ts={}&lat=55&lon=15",
        time::HOURLY[3],
        time::HOURLY[1]
    );
    let (status, body) = get(app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn test_get_forecast_omits_sentinel_cells() {
    let layout = grid::TINY_3X3;
    let dir = forecast_dir(&layout, &[100, 200], |ts| {
        if ts == 100 {
            create_constant_grid(3, 3, layout.empty_value)
        } else {
            create_test_grid(3, 3)
        }
    })
    .unwrap();
    let (app, _) = app_for(&dir).await;

    let (status, body) = get(app, "/getForecast?from_ts=0&to_ts=1000&lat=2&lon=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "200": 1002.0 }));
}

#[tokio::test]
async fn test_get_forecast_missing_parameter_is_bad_request() {
    let dir = hourly_dir();
    let (app, _) = app_for(&dir).await;

    let (status, body) = get(app, "/getForecast?from_ts=0&to_ts=10&lat=55").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameter: lon");
}

#[tokio::test]
async fn test_get_forecast_invalid_parameters_are_bad_request() {
    let dir = hourly_dir();
    let (app, _) = app_for(&dir).await;

    for uri in [
        "/getForecast?from_ts=abc&to_ts=10&lat=55&lon=15",
        "/getForecast?from_ts=0&to_ts=10.5&lat=55&lon=15",
        "/getForecast?from_ts=0&to_ts=10&lat=NaN&lon=15",
        "/getForecast?from_ts=0&to_ts=10&lat=55&lon=inf",
    ] {
        let (status, body) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn test_get_forecast_malformed_query_string_is_json_bad_request() {
    let dir = hourly_dir();
    let (app, _) = app_for(&dir).await;

    // A repeated key fails deserialization before parameter parsing runs.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/getForecast?from_ts=0&from_ts=1&to_ts=10&lat=55&lon=15")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("from_ts"));
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let (app, _) = app_for(&dir).await;

    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_ready_reports_catalog_and_cache() {
    let dir = hourly_dir();
    let (app, state) = app_for(&dir).await;

    let (status, body) = get(app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["files"], time::HOURLY.len());
    assert_eq!(body["first_timestamp"], time::HOURLY[0]);
    assert_eq!(body["last_timestamp"], time::HOURLY[5]);
    assert_eq!(body["header_cache"]["entries"], time::HOURLY.len());
    assert_eq!(body["max_open_files"], state.config.max_open_files);
}

#[tokio::test]
async fn test_ready_with_empty_catalog_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let (app, _) = app_for(&dir).await;

    let (status, body) = get(app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
    assert_eq!(body["files"], 0);
    assert!(body.get("first_timestamp").is_none());
}

#[tokio::test]
async fn test_metrics_exposes_query_counters() {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .unwrap();

    let dir = hourly_dir();
    let config = ForecastConfig {
        data_dir: dir.path().to_path_buf(),
        ..ForecastConfig::default()
    };
    let state = Arc::new(AppState::new(config).await.unwrap().with_prometheus(handle));
    let app = build_router(state);

    let (status, _) = get(app.clone(), "/getForecast?from_ts=0&to_ts=9999999999&lat=55&lon=15").await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("forecast_queries_total"));
    assert!(text.contains("forecast_values_returned_total"));
}
