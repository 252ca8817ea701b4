use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentIntentModel {
    pub mission_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentModel {
    pub payment_intent_id: String,
}

/// Handed back to the mobile client so it can drive the card flow.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentModel {
    pub client_secret: String,
    pub payment_intent_id: String,
}
