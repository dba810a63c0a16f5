// service/payment_service.rs
use std::sync::Arc;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{db::DBClient, subscriptiondb::SubscriptionExt},
    models::subscriptionmodel::Subscription,
    service::error::ServiceError,
};

type HmacSha256 = Hmac<Sha256>;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    id: String,
    url: String,
}

/// Stripe-backed payment provider. Entirely orthogonal to the engagement
/// lifecycle; it only creates checkout sessions and reacts to webhooks by
/// flipping subscription rows.
#[derive(Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
    secret_key: String,
    webhook_secret: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for PaymentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentService")
            .field("db_client", &self.db_client)
            .finish()
    }
}

/// Parses a `Stripe-Signature` header into (timestamp, v1 signature).
pub(crate) fn parse_signature_header(header: &str) -> Option<(String, String)> {
    let mut timestamp = None;
    let mut signature = None;
    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(value)) => timestamp = Some(value.to_string()),
            (Some("v1"), Some(value)) => signature = Some(value.to_string()),
            _ => {}
        }
    }
    Some((timestamp?, signature?))
}

pub(crate) fn verify_signed_payload(
    payload: &[u8],
    header: &str,
    webhook_secret: &str,
) -> Result<(), ServiceError> {
    let (timestamp, signature) = parse_signature_header(header)
        .ok_or_else(|| ServiceError::Validation("Malformed webhook signature header".to_string()))?;

    let expected = hex::decode(signature)
        .map_err(|_| ServiceError::Validation("Malformed webhook signature".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(webhook_secret.as_bytes())
        .map_err(|e| ServiceError::Payment(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    mac.verify_slice(&expected)
        .map_err(|_| ServiceError::Validation("Webhook signature mismatch".to_string()))
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>, config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            db_client,
            secret_key: config.stripe_secret_key.clone(),
            webhook_secret: config.stripe_webhook_secret.clone(),
            client,
        }
    }

    /// Opens a checkout session for a subscription plan and records it as a
    /// pending subscription.
    pub async fn create_checkout(
        &self,
        user_id: Uuid,
        plan_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, ServiceError> {
        let params = [
            ("mode", "subscription"),
            ("line_items[0][price]", plan_id),
            ("line_items[0][quantity]", "1"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
        ];

        let response = self
            .client
            .post(format!("{}/checkout/sessions", STRIPE_API_BASE))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Payment(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Payment(format!(
                "checkout session creation failed with {}: {}",
                status, body
            )));
        }

        let session: StripeSessionResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Payment(e.to_string()))?;

        self.db_client
            .create_pending_subscription(user_id, plan_id, &session.id)
            .await?;

        tracing::info!(
            "checkout session {} created for user {} (plan {})",
            session.id,
            user_id,
            plan_id
        );

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url,
        })
    }

    /// Verifies and applies a webhook event. Unknown event types are
    /// acknowledged without effect.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<Option<Subscription>, ServiceError> {
        verify_signed_payload(payload, signature_header, &self.webhook_secret)?;

        let event: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|_| ServiceError::Validation("Malformed webhook payload".to_string()))?;

        let event_type = event["type"].as_str().unwrap_or_default().to_string();
        let session_id = event["data"]["object"]["id"].as_str().unwrap_or_default();

        let subscription = match event_type.as_str() {
            "checkout.session.completed" => {
                self.db_client.activate_subscription(session_id).await?
            }
            "checkout.session.expired" | "customer.subscription.deleted" => {
                self.db_client.cancel_subscription(session_id).await?
            }
            _ => {
                tracing::debug!("ignoring webhook event type {}", event_type);
                None
            }
        };

        if let Some(ref subscription) = subscription {
            tracing::info!(
                "subscription {} moved to {:?} via {}",
                subscription.id,
                subscription.status,
                event_type
            );
        }

        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], timestamp: &str, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn parses_signature_header() {
        let parsed = parse_signature_header("t=1716000000,v1=abc123,v0=ignored");
        assert_eq!(
            parsed,
            Some(("1716000000".to_string(), "abc123".to_string()))
        );
        assert!(parse_signature_header("v1=only").is_none());
    }

    #[test]
    fn accepts_a_correctly_signed_payload() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let signature = sign(payload, "1716000000", "whsec_test");
        let header = format!("t=1716000000,v1={}", signature);
        assert!(verify_signed_payload(payload, &header, "whsec_test").is_ok());
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let signature = sign(payload, "1716000000", "whsec_test");
        let header = format!("t=1716000000,v1={}", signature);
        assert!(verify_signed_payload(b"{}", &header, "whsec_test").is_err());
    }

    #[test]
    fn rejects_a_wrong_secret() {
        let payload = br#"{}"#;
        let signature = sign(payload, "1716000000", "whsec_other");
        let header = format!("t=1716000000,v1={}", signature);
        assert!(verify_signed_payload(payload, &header, "whsec_test").is_err());
    }
}
