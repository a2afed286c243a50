use crate::api::session;
use crate::application::ErrorResponse;
use crate::infrastructure::AppConfig;
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Json},
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub shutdown: watch::Receiver<bool>,
}

/// 演示页面
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// 视图会话 WebSocket
pub async fn ws_session(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    info!("Received view session upgrade request");
    ws.on_upgrade(move |socket| session::run(socket, state))
}

/// 健康检查
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// 未知路径
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "NOT_FOUND".to_string(),
            format!("No route for {}", uri.path()),
        )),
    )
}
