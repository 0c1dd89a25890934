//! `/users` endpoints.

use serde_json::Value;

use super::{segment, take_field};
use crate::error::Result;
use crate::http::{AbortSignal, Request, RequestClient};
use crate::models::{User, UserUpdatePayload};

/// `GET /users/list`
pub async fn list(client: &RequestClient, signal: &AbortSignal) -> Result<Vec<User>> {
    let envelope: Value = client.send_request(Request::get("/users/list"), signal).await?;
    take_field(envelope, "users")
}

/// `GET /users/{uid}/profile`
pub async fn profile(client: &RequestClient, signal: &AbortSignal, uid: &str) -> Result<User> {
    let path = format!("/users/{}/profile", segment(uid));
    let envelope: Value = client.send_request(Request::get(path), signal).await?;
    take_field(envelope, "user")
}

/// `PATCH /users/{uid}/admin/update`
pub async fn admin_update(
    client: &RequestClient,
    signal: &AbortSignal,
    uid: &str,
    payload: &UserUpdatePayload,
) -> Result<()> {
    let path = format!("/users/{}/admin/update", segment(uid));
    let request = Request::patch(path).json(payload)?;
    let _: Value = client.send_request(request, signal).await?;
    Ok(())
}
