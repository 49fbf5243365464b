use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::level::{LevelGate, Severity};
use crate::logger::Logger;
use crate::observability::metrics;

/// Shared state for the level-control handlers.
#[derive(Clone)]
pub struct AdminState {
    pub gate: Arc<LevelGate>,
    /// When set, accepted changes are also recorded in the log itself.
    pub logger: Option<Logger>,
}

impl AdminState {
    pub fn new(gate: Arc<LevelGate>) -> Self {
        Self { gate, logger: None }
    }

    /// Wire the endpoint to a logger, sharing its gate.
    pub fn for_logger(logger: Logger) -> Self {
        Self {
            gate: logger.gate(),
            logger: Some(logger),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelResponse {
    pub level: Severity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
struct LevelRequest {
    level: Option<String>,
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

pub async fn get_level(State(state): State<AdminState>) -> Json<LevelResponse> {
    Json(LevelResponse {
        level: state.gate.current_level(),
    })
}

pub async fn set_level(
    State(state): State<AdminState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(name) = requested_level(&headers, &body, query.as_deref()) else {
        return bad_request("must specify a logging level".to_string());
    };

    let level = match name.parse::<Severity>() {
        Ok(level) => level,
        Err(e) => {
            tracing::warn!(requested = %name, "Rejected log level change");
            return bad_request(e.to_string());
        }
    };

    let previous = state.gate.set_level(level);
    metrics::record_level_change(level);
    tracing::info!(from = %previous, to = %level, "Log level changed");

    if let Some(logger) = state.logger {
        // File writes may rotate; keep them off the runtime workers.
        let written = tokio::task::spawn_blocking(move || {
            let fields = [("from", previous.as_str()), ("to", level.as_str())];
            logger.warn_with_fields("log level changed", fields)
        })
        .await;

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Failed to record log level change"),
            Err(e) => tracing::warn!(error = %e, "Log level change record task failed"),
        }
    }

    Json(LevelResponse { level }).into_response()
}

/// Find the requested level in the body (JSON or form) or the query string.
fn requested_level(headers: &HeaderMap, body: &[u8], query: Option<&str>) -> Option<String> {
    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let from_body = if body.is_empty() {
        None
    } else if is_form {
        form_level(body)
    } else {
        serde_json::from_slice::<LevelRequest>(body)
            .ok()
            .and_then(|req| req.level)
            .or_else(|| form_level(body))
    };

    from_body.or_else(|| query.and_then(|q| form_level(q.as_bytes())))
}

fn form_level(input: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(input)
        .find(|(key, _)| key == "level")
        .map(|(_, value)| value.into_owned())
}
