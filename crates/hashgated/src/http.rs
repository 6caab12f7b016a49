use crate::error::RelayError;
use crate::metrics::counters;
use crate::state::RelayState;
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use hashgate_common::types::WorkUnit;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
struct PublishResponse {
    result: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct PopResponse {
    prehash: String,
    nonce: String,
}

/// Builds the control-surface router over the shared relay state.
///
/// Routes:
/// - `GET /{prehash}/{start_nonce}/{difficulty}/{authorization}` publishes
///   a work unit; the JSON body's `result` field is `ok`, `auth_fail`,
///   `prehash_fail`, `difficulty_fail` or `device_fail`.
/// - `GET /` pops the oldest accepted result, or
///   `{"prehash":"","nonce":"-1"}` when none is pending.
pub fn router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/", get(pop_result))
        .route(
            "/{prehash}/{start_nonce}/{difficulty}/{authorization}",
            get(publish_work),
        )
        .with_state(state)
}

async fn publish_work(
    State(state): State<Arc<RelayState>>,
    Path((prehash, start_nonce, difficulty, authorization)): Path<(String, u64, u32, String)>,
) -> Json<PublishResponse> {
    // Authorization first: a bad secret reveals nothing about the other
    // parameters
    if !state.authorize(&authorization) {
        counters::publishes_total("auth_fail");
        return Json(PublishResponse {
            result: "auth_fail",
        });
    }

    let unit = WorkUnit {
        prehash,
        start_nonce,
        difficulty,
    };
    let result = match state.publish(unit) {
        Ok(()) => "ok",
        Err(RelayError::PrehashLength { .. }) => "prehash_fail",
        Err(RelayError::Difficulty(_)) => "difficulty_fail",
        Err(e) => {
            tracing::error!(error = %e, "publish failed");
            "device_fail"
        }
    };
    counters::publishes_total(result);
    debug!(result, "publish handled");
    Json(PublishResponse { result })
}

async fn pop_result(State(state): State<Arc<RelayState>>) -> Json<PopResponse> {
    match state.pop_result() {
        Some(unit) => Json(PopResponse {
            prehash: unit.prehash,
            nonce: unit.nonce.to_string(),
        }),
        None => Json(PopResponse {
            prehash: String::new(),
            nonce: "-1".to_string(),
        }),
    }
}
