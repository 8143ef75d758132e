//! Point forecast handler.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use forecast_grid::ForecastQuery;

use super::error_response;
use crate::state::AppState;

/// Raw query parameters for `/getForecast`.
///
/// Kept as strings so that missing and malformed values produce a JSON
/// error instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastParams {
    pub from_ts: Option<String>,
    pub to_ts: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl ForecastParams {
    /// Parse into a [`ForecastQuery`], or explain what is wrong.
    pub fn parse(&self) -> Result<ForecastQuery, String> {
        let from_ts: i64 = required(&self.from_ts, "from_ts")?;
        let to_ts: i64 = required(&self.to_ts, "to_ts")?;
        let lat: f64 = required(&self.lat, "lat")?;
        let lon: f64 = required(&self.lon, "lon")?;

        if !lat.is_finite() || !lon.is_finite() {
            return Err("lat and lon must be finite numbers".to_string());
        }

        Ok(ForecastQuery::new(from_ts, to_ts, lat, lon))
    }
}

fn required<T: FromStr>(value: &Option<String>, name: &str) -> Result<T, String> {
    let raw = match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(format!("Missing required parameter: {}", name)),
    };
    raw.parse()
        .map_err(|_| format!("Invalid value for {}: {:?}", name, raw))
}

/// GET /getForecast?from_ts=&to_ts=&lat=&lon=
///
/// Returns a JSON object mapping each timestamp in range to the value at
/// the requested point, in ascending timestamp order.
pub async fn forecast_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            debug!(error = %rejection, "malformed forecast query string");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let query = match params.parse() {
        Ok(query) => query,
        Err(message) => {
            debug!(?params, %message, "rejected forecast request");
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };

    let values = state.engine.query_request(&query).await;
    Json(values).into_response()
}
