//! PayPal payout flow for a local authority's collected income.
//!
//! Starting a payment only asks the backend for an approval link. The
//! authority's income is cleared once the operator comes back from PayPal
//! with a success result, never before.

use url::Url;

use crate::api::{local_authority, transactions};
use crate::error::{AdminError, Result};
use crate::http::{AbortSignal, RequestClient};
use crate::models::PaypalPaymentRequest;

/// Result reported by the payment provider on its return redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Cancelled,
}

impl PaymentOutcome {
    /// Reads the outcome from the `success` / `cancel` query parameters of
    /// the return URL.
    pub fn from_return_url(return_url: &str) -> Result<Self> {
        let url = Url::parse(return_url)
            .map_err(|e| AdminError::InvalidPayment(format!("invalid return URL: {}", e)))?;

        let mut outcome = None;
        for (key, value) in url.query_pairs() {
            if value.is_empty() || value == "false" {
                continue;
            }
            match key.as_ref() {
                "success" => outcome = Some(PaymentOutcome::Success),
                // Cancellation wins over a stray success flag
                "cancel" => return Ok(PaymentOutcome::Cancelled),
                _ => {}
            }
        }

        outcome.ok_or_else(|| {
            AdminError::InvalidPayment("return URL carries neither success nor cancel".to_string())
        })
    }
}

/// Asks the backend to create a PayPal payment and returns the approval link
/// the operator must open.
pub async fn initiate(
    client: &RequestClient,
    signal: &AbortSignal,
    uid: &str,
    authority_id: &str,
    money: f64,
) -> Result<String> {
    if !money.is_finite() || money <= 0.0 {
        return Err(AdminError::InvalidPayment(format!(
            "amount must be greater than zero, got {}",
            money
        )));
    }
    if uid.trim().is_empty() || authority_id.trim().is_empty() {
        return Err(AdminError::InvalidPayment(
            "user and authority ids are required".to_string(),
        ));
    }

    let request = PaypalPaymentRequest {
        money,
        authority_id: authority_id.to_string(),
    };
    let response = transactions::create_paypal_payment(client, signal, uid, &request).await?;

    let link = response
        .approval_link
        .filter(|l| !l.trim().is_empty())
        .ok_or(AdminError::MissingField("approvalLink"))?;

    tracing::info!("Payment for authority {} awaiting approval", authority_id);
    Ok(link)
}

/// Clears the authority's income after a successful payment.
pub async fn confirm(client: &RequestClient, signal: &AbortSignal, authority_id: &str) -> Result<()> {
    local_authority::mark_paid(client, signal, authority_id).await?;
    tracing::info!("Income cleared for authority {}", authority_id);
    Ok(())
}

/// Applies the provider's return result. Income is only cleared on success.
pub async fn complete(
    client: &RequestClient,
    signal: &AbortSignal,
    authority_id: &str,
    outcome: PaymentOutcome,
) -> Result<PaymentOutcome> {
    match outcome {
        PaymentOutcome::Success => confirm(client, signal, authority_id).await?,
        PaymentOutcome::Cancelled => {
            tracing::info!("Payment for authority {} cancelled", authority_id);
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::AbortHandle;

    #[test]
    fn test_outcome_from_return_url() {
        assert_eq!(
            PaymentOutcome::from_return_url("http://localhost:3000/paypal-payment?success=true")
                .unwrap(),
            PaymentOutcome::Success
        );
        assert_eq!(
            PaymentOutcome::from_return_url("http://localhost:3000/paypal-payment?cancel=true")
                .unwrap(),
            PaymentOutcome::Cancelled
        );
        assert_eq!(
            PaymentOutcome::from_return_url(
                "http://localhost:3000/paypal-payment?success=true&cancel=1"
            )
            .unwrap(),
            PaymentOutcome::Cancelled
        );
    }

    #[test]
    fn test_outcome_requires_a_flag() {
        for url in [
            "http://localhost:3000/paypal-payment",
            "http://localhost:3000/paypal-payment?success=false",
            "not a url",
        ] {
            assert!(
                matches!(
                    PaymentOutcome::from_return_url(url),
                    Err(AdminError::InvalidPayment(_))
                ),
                "{url}"
            );
        }
    }

    #[tokio::test]
    async fn test_initiate_rejects_bad_amount_without_calling_backend() {
        let client = RequestClient::new("http://127.0.0.1:9");
        let handle = AbortHandle::new();

        for money in [0.0, -5.0, f64::NAN] {
            let result = initiate(&client, &handle.signal(), "u1", "a1", money).await;
            assert!(matches!(result, Err(AdminError::InvalidPayment(_))));
        }
        assert!(!client.is_loading());
        assert!(client.error().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_outcome_makes_no_call() {
        let client = RequestClient::new("http://127.0.0.1:9");
        let handle = AbortHandle::new();

        let outcome = complete(&client, &handle.signal(), "a1", PaymentOutcome::Cancelled)
            .await
            .unwrap();
        assert_eq!(outcome, PaymentOutcome::Cancelled);
        assert_eq!(client.state(), Default::default());
    }
}
