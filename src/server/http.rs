use crate::app::dto::DiagnoseRequest;
use crate::app::engine::DiagnosticsEngine;
use crate::domain::object::ObjectSet;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Clone)]
pub struct HttpState {
    pub engine: Arc<DiagnosticsEngine>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> impl IntoResponse {
    (status, Json(ApiErrorBody { error: msg.into() }))
}

pub fn build_router(engine: DiagnosticsEngine) -> Router {
    let state = Arc::new(HttpState {
        engine: Arc::new(engine),
    });

    Router::new()
        .route("/health", get(health))
        .route("/diagnose", post(diagnose))
        .route("/graph", post(graph))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(engine: DiagnosticsEngine, addr: SocketAddr) -> Result<()> {
    let app = build_router(engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(state.engine.health())
}

async fn diagnose(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<DiagnoseRequest>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.report(&ObjectSet::from_values(req.items))).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        )
        .into_response(),
    }
}

async fn graph(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<DiagnoseRequest>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.graph_dump(&ObjectSet::from_values(req.items))).await {
        Ok(dump) => Json(dump).into_response(),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        )
        .into_response(),
    }
}
