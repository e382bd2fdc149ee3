use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;

pub const RUNNING_TEXT: &str = "Bot is running!";

async fn running() -> &'static str {
    RUNNING_TEXT
}

/// Answers GET on any path, so that whatever pings the bot to keep it awake
/// sees an open port.
pub fn router() -> Router {
    Router::new()
        .route("/", get(running))
        .fallback_service(get(running))
}

/// Serve [`router`] on all interfaces. Only returns on failure.
pub async fn serve(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("Keep-alive server listening on {addr}");
    axum::serve(listener, router()).await
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::{router, RUNNING_TEXT};

    async fn request(method: Method, uri: &str) -> (StatusCode, String) {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn root_says_running() {
        let (status, body) = request(Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, RUNNING_TEXT);
    }

    #[tokio::test]
    async fn any_get_says_running() {
        let (status, body) = request(Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, RUNNING_TEXT);
    }

    #[tokio::test]
    async fn other_methods_are_refused() {
        let (status, _) = request(Method::POST, "/").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
