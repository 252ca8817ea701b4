use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use tracing::error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Minimal Stripe client built on reqwest. Every call is bounded by the
/// client-wide request timeout.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub created: Option<i64>,
    pub livemode: Option<bool>,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub status: Option<String>,
    pub client_secret: Option<String>,
    pub latest_charge: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
    param: Option<String>,
    decline_code: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: String, webhook_secret: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            secret_key,
            webhook_secret,
        })
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let details = serde_json::from_str::<StripeErrorEnvelope>(&body)
            .map(|envelope| envelope.error)
            .ok();

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?details.as_ref().and_then(|d| d.type_.as_deref()),
            stripe_error_code = ?details.as_ref().and_then(|d| d.code.as_deref()),
            stripe_error_param = ?details.as_ref().and_then(|d| d.param.as_deref()),
            stripe_error_message = ?details.as_ref().and_then(|d| d.message.as_deref()),
            stripe_decline_code = ?details.as_ref().and_then(|d| d.decline_code.as_deref()),
            context = %context,
            "stripe api request failed"
        );

        anyhow::bail!(
            "Stripe API request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }

    /// Creates a Stripe customer for the given email/user.
    /// https://stripe.com/docs/api/customers/create
    pub async fn create_customer(&self, email: &str, user_id: Uuid) -> Result<String> {
        let body = [
            ("email", email.to_string()),
            ("metadata[user_id]", user_id.to_string()),
        ];

        let resp = self
            .http
            .post(format!("{}/customers", STRIPE_API_BASE))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create customer").await?;

        #[derive(Deserialize)]
        struct CustomerResp {
            id: String,
        }

        let parsed: CustomerResp = resp.json().await?;
        Ok(parsed.id)
    }

    /// Creates a PaymentIntent in minor currency units.
    /// https://stripe.com/docs/api/payment_intents/create
    pub async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        customer_id: &str,
        metadata: HashMap<String, String>,
    ) -> Result<StripePaymentIntent> {
        let mut body: Vec<(String, String)> = vec![
            ("amount".to_string(), amount_minor.to_string()),
            ("currency".to_string(), currency.to_string()),
            ("customer".to_string(), customer_id.to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        for (key, value) in metadata {
            body.push((format!("metadata[{}]", key), value));
        }

        let resp = self
            .http
            .post(format!("{}/payment_intents", STRIPE_API_BASE))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create payment intent").await?;

        let parsed: StripePaymentIntent = resp.json().await?;
        Ok(parsed)
    }

    /// Fetches the current state of a PaymentIntent.
    pub async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<StripePaymentIntent> {
        let resp = self
            .http
            .get(format!(
                "{}/payment_intents/{}",
                STRIPE_API_BASE, payment_intent_id
            ))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "retrieve payment intent").await?;

        let parsed: StripePaymentIntent = resp.json().await?;
        Ok(parsed)
    }

    /// Refunds the full charge behind a PaymentIntent.
    /// https://stripe.com/docs/api/refunds/create
    pub async fn refund_payment_intent(&self, payment_intent_id: &str) -> Result<()> {
        let body = [("payment_intent", payment_intent_id.to_string())];

        let resp = self
            .http
            .post(format!("{}/refunds", STRIPE_API_BASE))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        Self::ensure_success(resp, "refund payment intent").await?;

        Ok(())
    }

    /// Verifies the webhook signature. https://stripe.com/docs/webhooks/signatures
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in stripe-signature"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in stripe-signature"))?;

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();
        let provided = hex::decode(signature)?;

        if expected[..] != provided[..] {
            anyhow::bail!("stripe webhook signature mismatch");
        }

        let event: StripeEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }

    /// Pulls the PaymentIntent object out of a webhook event payload.
    pub fn extract_payment_intent(event: &StripeEvent) -> Option<StripePaymentIntent> {
        serde_json::from_value(event.data.object.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StripeClient {
        StripeClient::new("sk_test_123".to_string(), "whsec_testsecret".to_string())
            .expect("client should build")
    }

    fn sign(secret: &str, timestamp: &str, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
        mac.update(format!("{}.{}", timestamp, payload).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_correctly_signed_webhook() {
        let client = client();
        let payload = r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_1","status":"succeeded"}}}"#;
        let signature = sign("whsec_testsecret", "1700000000", payload);
        let header = format!("t=1700000000,v1={}", signature);

        let event = client
            .verify_webhook_signature(payload.as_bytes(), &header)
            .expect("valid signature should verify");
        assert_eq!(event.type_, "payment_intent.succeeded");

        let intent = StripeClient::extract_payment_intent(&event).expect("intent in payload");
        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.status.as_deref(), Some("succeeded"));
    }

    #[test]
    fn rejects_tampered_payload() {
        let client = client();
        let payload = r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{}}}"#;
        let signature = sign("whsec_testsecret", "1700000000", payload);
        let header = format!("t=1700000000,v1={}", signature);

        let tampered = r#"{"id":"evt_1","type":"payment_intent.payment_failed","data":{"object":{}}}"#;
        assert!(
            client
                .verify_webhook_signature(tampered.as_bytes(), &header)
                .is_err()
        );
    }

    #[test]
    fn rejects_malformed_signature_header() {
        let client = client();
        let payload = b"{}";

        assert!(client.verify_webhook_signature(payload, "").is_err());
        assert!(
            client
                .verify_webhook_signature(payload, "t=1700000000")
                .is_err()
        );
        assert!(
            client
                .verify_webhook_signature(payload, "v1=deadbeef")
                .is_err()
        );
    }
}
