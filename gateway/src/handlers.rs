use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use phantom_core::runtime::Runtime;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::{AgentRequest, AgentResult, ApiError, CatalogResponse, HealthResponse};

// Application State: the runtime owns the dispatcher and the Brain
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<Runtime>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/tools", get(list_tools))
        .route("/agent", post(execute_agent))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- HANDLERS ---

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

async fn list_tools(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        tools: state.runtime.registry().catalog(),
    })
}

// The Orchestrator Handler
async fn execute_agent(
    State(state): State<AppState>,
    Json(payload): Json<AgentRequest>,
) -> Result<Json<AgentResult>, ApiError> {
    let result = state.runtime.run(payload).await?;
    Ok(Json(result))
}
