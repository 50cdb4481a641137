use crate::error::GenieError;
use crate::render::{self, TabView};
use crate::types::*;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/search", post(search_handler))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/search", post(session_search_handler))
        .route("/sessions/:id/tab", put(set_tab_handler))
        .route("/sessions/:id/tabs/:tab", get(tab_view_handler))
        .route("/sessions/:id/render", get(render_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_error(e: GenieError) -> ApiError {
    let status = match &e {
        GenieError::EmptyQuery | GenieError::InvalidOptions(_) => StatusCode::BAD_REQUEST,
        GenieError::MissingCredentials => StatusCode::UNPROCESSABLE_ENTITY,
        GenieError::SessionNotFound(_) => StatusCode::NOT_FOUND,
    };
    if status == StatusCode::NOT_FOUND {
        warn!("{}", e);
    } else {
        error!("Search error: {}", e);
    }
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "genie",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ResultBundle>, ApiError> {
    info!("Processing search request: {}", request.query);
    state.search(request).await.map(Json).map_err(api_error)
}

async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = state.sessions.get(id).await.map_err(api_error)?;
    Ok(Json(session.snapshot(id)))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn session_search_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    info!("Processing search request for session {}: {}", id, request.query);
    let session = state
        .search_in_session(id, request)
        .await
        .map_err(api_error)?;
    Ok(Json(session.snapshot(id)))
}

async fn set_tab_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<TabRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = state
        .sessions
        .set_active_tab(id, request.tab)
        .await
        .map_err(api_error)?;
    Ok(Json(session.snapshot(id)))
}

async fn tab_view_handler(
    State(state): State<Arc<AppState>>,
    Path((id, tab)): Path<(Uuid, Tab)>,
) -> Result<Json<TabView>, ApiError> {
    let session = state.sessions.get(id).await.map_err(api_error)?;
    Ok(Json(render::tab_view(&session.bundle, tab)))
}

async fn render_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.sessions.get(id).await.map_err(api_error)?;
    let body = render::render_markdown(&session.bundle, session.active_tab);
    Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], body))
}
