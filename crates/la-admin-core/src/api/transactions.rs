//! `/transaction` endpoints.

use serde_json::Value;

use super::{segment, take_field};
use crate::error::Result;
use crate::http::{AbortSignal, Request, RequestClient};
use crate::models::{DailyIncome, PaypalPaymentRequest, PaypalPaymentResponse};

/// `GET /transaction/daily_income`
pub async fn daily_income(client: &RequestClient, signal: &AbortSignal) -> Result<Vec<DailyIncome>> {
    let envelope: Value = client
        .send_request(Request::get("/transaction/daily_income"), signal)
        .await?;
    take_field(envelope, "dailyIncome")
}

/// `POST /transaction/{uid}/paypal/local_authority`
pub async fn create_paypal_payment(
    client: &RequestClient,
    signal: &AbortSignal,
    uid: &str,
    payment: &PaypalPaymentRequest,
) -> Result<PaypalPaymentResponse> {
    let path = format!("/transaction/{}/paypal/local_authority", segment(uid));
    let request = Request::post(path).json(payment)?;
    Ok(client.send_request(request, signal).await?)
}
