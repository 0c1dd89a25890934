//! Request client tests against a stub backend.

mod common;

use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
};
use la_admin_core::http::{
    AbortHandle, AbortSignal, GENERIC_ERROR_MESSAGE, Request, RequestClient, RequestError,
    RequestState,
};
use secrecy::SecretString;
use serde_json::{Value, json};

use common::{client_for, dead_backend, spawn_backend};

async fn users() -> Json<Value> {
    Json(json!({ "users": [{ "_id": "1", "name": "A", "role": "admin" }] }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}

async fn html_failure() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "<html>Bad gateway</html>")
}

async fn empty_failure() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn garbled() -> (StatusCode, &'static str) {
    (StatusCode::OK, "{not json")
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(300)).await;
    Json(json!({ "ok": true }))
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Value> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "method": method.as_str(),
        "authorization": header("authorization"),
        "content_type": header("content-type"),
        "x_client": header("x-client"),
        "body": body,
    }))
}

fn app() -> Router {
    Router::new()
        .route("/users/list", get(users))
        .route("/missing", get(not_found))
        .route("/html-failure", get(html_failure))
        .route("/empty-failure", get(empty_failure))
        .route("/garbled", get(garbled))
        .route("/no-content", any(no_content))
        .route("/slow", get(slow))
        .route("/echo", any(echo))
}

mod success {
    use super::*;

    #[tokio::test]
    async fn users_list_resolves_to_payload() {
        let client = client_for(app()).await;

        let response: Value = client
            .send_request(Request::get("/users/list"), &AbortSignal::never())
            .await
            .unwrap();

        assert_eq!(
            response["users"],
            json!([{ "_id": "1", "name": "A", "role": "admin" }])
        );
        assert_eq!(client.state(), RequestState::default());
        assert!(!client.is_loading());
        assert!(client.error().is_none());
    }

    #[tokio::test]
    async fn empty_body_parses_as_unit() {
        let client = client_for(app()).await;

        client
            .send_request::<()>(Request::delete("/no-content"), &AbortSignal::never())
            .await
            .unwrap();

        assert!(client.error().is_none());
    }

    #[tokio::test]
    async fn absolute_url_bypasses_base() {
        let base = spawn_backend(app()).await;
        let client = RequestClient::new("http://127.0.0.1:9/unused");

        let response: Value = client
            .send_request(
                Request::get(format!("{}/users/list", base)),
                &AbortSignal::never(),
            )
            .await
            .unwrap();

        assert!(response["users"].is_array());
    }

    #[tokio::test]
    async fn body_method_and_headers_reach_backend() {
        let token = SecretString::from("abc123".to_string());
        let client = client_for(app())
            .await
            .with_bearer_token(&token)
            .with_default_header("X-Client", "la-admin");

        let request = Request::patch("/echo")
            .json(&json!({ "name": "MBPJ" }))
            .unwrap()
            .header("X-Client", "override");
        let response: Value = client
            .send_request(request, &AbortSignal::never())
            .await
            .unwrap();

        assert_eq!(response["method"], "PATCH");
        assert_eq!(response["authorization"], "Bearer abc123");
        assert_eq!(response["content_type"], "application/json");
        assert_eq!(response["x_client"], "override");
        assert_eq!(response["body"], r#"{"name":"MBPJ"}"#);
    }

    #[tokio::test]
    async fn loading_is_raised_while_in_flight() {
        let client = client_for(app()).await;
        let mut rx = client.subscribe();

        let watcher = async {
            rx.wait_for(|s| s.is_loading).await.map(|s| s.clone())
        };
        let never = AbortSignal::never();
        let (seen, result) = tokio::join!(
            watcher,
            client.send_request::<Value>(Request::get("/slow"), &never)
        );

        assert!(seen.unwrap().is_loading);
        assert!(result.is_ok());
        assert!(!client.is_loading());
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn server_message_becomes_error() {
        let client = client_for(app()).await;

        let err = client
            .send_request::<Value>(Request::get("/missing"), &AbortSignal::never())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RequestError::ServerError {
                status: 404,
                message: "Not found".to_string()
            }
        );
        assert_eq!(client.error(), Some("Not found".to_string()));
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn unparseable_failure_body_uses_generic_message() {
        let client = client_for(app()).await;

        for path in ["/html-failure", "/empty-failure"] {
            let err = client
                .send_request::<Value>(Request::get(path), &AbortSignal::never())
                .await
                .unwrap_err();

            assert!(matches!(err, RequestError::UnknownFailure { .. }), "{path}");
            assert_eq!(client.error(), Some(GENERIC_ERROR_MESSAGE.to_string()));
            assert!(!client.is_loading());
        }
    }

    #[tokio::test]
    async fn garbled_success_body_is_network_failure() {
        let client = client_for(app()).await;

        let err = client
            .send_request::<Value>(Request::get("/garbled"), &AbortSignal::never())
            .await
            .unwrap_err();

        assert!(matches!(err, RequestError::NetworkFailure(_)));
        assert!(client.error().is_some());
    }

    #[tokio::test]
    async fn unreachable_server_is_network_failure() {
        let client = RequestClient::new(dead_backend().await);

        let err = client
            .send_request::<Value>(Request::get("/users/list"), &AbortSignal::never())
            .await
            .unwrap_err();

        assert!(matches!(err, RequestError::NetworkFailure(_)));
        assert!(!client.is_loading());
        assert_eq!(client.error(), Some(err.to_string()));
    }

    #[tokio::test]
    async fn timeout_is_network_failure() {
        let client = client_for(app())
            .await
            .with_timeout(Duration::from_millis(50));

        let err = client
            .send_request::<Value>(Request::get("/slow"), &AbortSignal::never())
            .await
            .unwrap_err();

        match err {
            RequestError::NetworkFailure(message) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn next_dispatch_clears_previous_error() {
        let client = client_for(app()).await;

        let _ = client
            .send_request::<Value>(Request::get("/missing"), &AbortSignal::never())
            .await;
        assert!(client.error().is_some());

        client
            .send_request::<Value>(Request::get("/users/list"), &AbortSignal::never())
            .await
            .unwrap();
        assert!(client.error().is_none());
    }

    #[tokio::test]
    async fn last_writer_wins_on_shared_slot() {
        let client = client_for(app()).await;

        let never_fast = AbortSignal::never();
        let never_slow = AbortSignal::never();
        let (fast, slow) = tokio::join!(
            client.send_request::<Value>(Request::get("/missing"), &never_fast),
            client.send_request::<Value>(Request::get("/slow"), &never_slow),
        );

        assert!(fast.is_err());
        assert!(slow.is_ok());
        // Both dispatches ran before the fast failure landed; the slow
        // success only lowers loading, so the failure message stays.
        assert!(!client.is_loading());
        assert_eq!(client.error(), Some("Not found".to_string()));
    }
}

mod cancellation {
    use super::*;

    #[tokio::test]
    async fn abort_mid_flight_leaves_state_untouched() {
        let client = client_for(app()).await;
        let handle = AbortHandle::new();
        let signal = handle.signal();

        let request = client.send_request::<Value>(Request::get("/slow"), &signal);
        let abort = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.abort();
        };
        let (result, ()) = tokio::join!(request, abort);

        assert_eq!(result.unwrap_err(), RequestError::Aborted);
        let at_abort = client.state();

        // Outlive the backend's delay; nothing may land afterward
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(client.state(), at_abort);
        assert!(client.error().is_none());
    }

    #[tokio::test]
    async fn dropping_handle_aborts_request() {
        let client = client_for(app()).await;
        let handle = AbortHandle::new();
        let signal = handle.signal();

        let request = client.send_request::<Value>(Request::get("/slow"), &signal);
        let teardown = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(handle);
        };
        let (result, ()) = tokio::join!(request, teardown);

        assert_eq!(result.unwrap_err(), RequestError::Aborted);
    }

    #[tokio::test]
    async fn already_aborted_signal_never_dispatches() {
        let client = client_for(app()).await;
        let handle = AbortHandle::new();
        handle.abort();

        let result = client
            .send_request::<Value>(Request::get("/users/list"), &handle.signal())
            .await;

        assert_eq!(result.unwrap_err(), RequestError::Aborted);
        assert_eq!(client.state(), RequestState::default());
    }
}
