use std::time::Instant;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use common::{DoneResponse, PollRequest, PollResponse};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/tasks/poll", post(poll_task))
        .route("/api/v1/done", get(job_done))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/* ---------------- handlers ---------------- */

async fn health() -> &'static str {
    "ok"
}

// The single worker-facing call: report the previous task, receive the next
// assignment. Both happen under one lock hold inside Ledger::poll.
async fn poll_task(
    State(state): State<AppState>,
    Json(req): Json<PollRequest>,
) -> Json<PollResponse> {
    let assignment = {
        let mut ledger = state.ledger.lock().unwrap();
        ledger.poll(req.report, Instant::now())
    };

    debug!("poll answered with {:?}", assignment);
    Json(PollResponse { assignment })
}

// Read-only completion gate, polled by the driver loop rather than workers.
async fn job_done(State(state): State<AppState>) -> Json<DoneResponse> {
    let done = state.ledger.lock().unwrap().done();
    Json(DoneResponse { done })
}
