//! HTTP routes: health, lobby snapshot, category tabs and selection.

use axum::{
    extract::State,
    http::{self, header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::lobby::state::SharedLobby;
use crate::lobby::LobbyError;

#[derive(Clone)]
pub struct AppState {
    pub lobby: SharedLobby,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/lobby", get(lobby_view))
        .route("/api/categories", get(categories))
        .route("/api/lobby/category", post(select_category))
        .layer(
            CorsLayer::new()
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str { "ok" }

pub async fn lobby_view(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.lobby.lock().view())
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
    pub active_category: Option<String>,
}

pub async fn categories(State(state): State<AppState>) -> impl IntoResponse {
    let lobby = state.lobby.lock();
    Json(CategoriesResponse {
        categories: lobby.tabs(),
        active_category: lobby.active_category().map(str::to_string),
    })
}

#[derive(Debug, Deserialize)]
pub struct SelectCategory {
    pub category: String,
}

pub async fn select_category(
    State(state): State<AppState>,
    Json(SelectCategory { category }): Json<SelectCategory>,
) -> impl IntoResponse {
    let category = category.trim();
    if category.is_empty() {
        return (StatusCode::BAD_REQUEST, "category must not be empty").into_response();
    }

    let mut lobby = state.lobby.lock();
    match lobby.select(category) {
        Ok(games) => {
            tracing::debug!(%category, shown = games.len(), "category selected");
            Json(lobby.view()).into_response()
        }
        Err(LobbyError::NotReady) => (StatusCode::CONFLICT, "lobby not ready").into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
