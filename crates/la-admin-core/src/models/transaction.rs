//! Transaction and payment models.

use serde::{Deserialize, Serialize};

/// Income collected on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyIncome {
    pub date: String,
    pub income: f64,
}

/// Body of `POST /transaction/{uid}/paypal/local_authority`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaypalPaymentRequest {
    pub money: f64,
    pub authority_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaypalPaymentResponse {
    #[serde(rename = "approvalLink", default)]
    pub approval_link: Option<String>,
}
