//! `/local_authority` endpoints.

use serde_json::Value;

use super::{segment, take_field};
use crate::error::Result;
use crate::http::{AbortSignal, Request, RequestClient};
use crate::models::{LocalAuthority, LocalAuthorityPayload};

/// `GET /local_authority/list`
pub async fn list(client: &RequestClient, signal: &AbortSignal) -> Result<Vec<LocalAuthority>> {
    let envelope: Value = client
        .send_request(Request::get("/local_authority/list"), signal)
        .await?;
    take_field(envelope, "localAuthority")
}

/// `GET /local_authority/{lid}/profile`
pub async fn profile(
    client: &RequestClient,
    signal: &AbortSignal,
    lid: &str,
) -> Result<LocalAuthority> {
    let path = format!("/local_authority/{}/profile", segment(lid));
    let envelope: Value = client.send_request(Request::get(path), signal).await?;
    take_field(envelope, "localAuthority")
}

/// `POST /local_authority/create`
pub async fn create(
    client: &RequestClient,
    signal: &AbortSignal,
    payload: &LocalAuthorityPayload,
) -> Result<()> {
    let request = Request::post("/local_authority/create").json(payload)?;
    let _: Value = client.send_request(request, signal).await?;
    Ok(())
}

/// `PATCH /local_authority/{lid}/update`
pub async fn update(
    client: &RequestClient,
    signal: &AbortSignal,
    lid: &str,
    payload: &LocalAuthorityPayload,
) -> Result<()> {
    let path = format!("/local_authority/{}/update", segment(lid));
    let request = Request::patch(path).json(payload)?;
    let _: Value = client.send_request(request, signal).await?;
    Ok(())
}

/// `DELETE /local_authority/{id}/delete`
pub async fn delete(client: &RequestClient, signal: &AbortSignal, id: &str) -> Result<()> {
    let path = format!("/local_authority/{}/delete", segment(id));
    let _: Value = client.send_request(Request::delete(path), signal).await?;
    Ok(())
}

/// `PATCH /local_authority/{authorityId}/paid`, clearing collected income.
pub async fn mark_paid(client: &RequestClient, signal: &AbortSignal, id: &str) -> Result<()> {
    let path = format!("/local_authority/{}/paid", segment(id));
    let _: Value = client.send_request(Request::patch(path), signal).await?;
    Ok(())
}
