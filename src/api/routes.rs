use super::handlers::*;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/ws", get(ws_session))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::AppConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;
    use tower::ServiceExt;

    fn app() -> Router {
        let (_tx, shutdown) = watch::channel(false);
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            gateway_delay: Duration::from_millis(9000),
            notice_duration: Duration::from_millis(9000),
            mailbox_capacity: 8,
            outbound_capacity: 8,
        };
        create_router(AppState {
            config: Arc::new(config),
            shutdown,
        })
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get_body("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_index_page() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Please do not use real credit card information on this site!"));
        assert!(body.contains("/ws"));
    }

    #[tokio::test]
    async fn test_ws_requires_upgrade() {
        let (status, _) = get_body("/ws").await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = get_body("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("NOT_FOUND"));
    }
}
