//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use la_admin_core::http::RequestClient;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test backend crashed");
    });

    format!("http://{}", addr)
}

/// Creates a client for a freshly spawned backend.
pub async fn client_for(app: Router) -> RequestClient {
    RequestClient::new(spawn_backend(app).await)
}

/// Returns a base URL nothing is listening on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}", addr)
}
