use std::{collections::HashMap, sync::Arc};

use anyhow::{Result as AnyResult, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use crates::{
    domain::{
        entities::payments::{InsertPaymentEntity, PaymentEntity},
        repositories::{
            missions::MissionRepository, payments::PaymentRepository, users::UserRepository,
        },
        value_objects::{
            enums::payment_statuses::PaymentStatus, payments::PaymentIntentModel,
        },
    },
    payments::stripe_client::{StripeClient, StripeEvent, StripePaymentIntent},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const PLATFORM_CURRENCY: &str = "eur";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StripeGateway: Send + Sync {
    async fn create_customer(&self, email: &str, user_id: Uuid) -> AnyResult<String>;

    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        customer_id: &str,
        metadata: HashMap<String, String>,
    ) -> AnyResult<StripePaymentIntent>;

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> AnyResult<StripePaymentIntent>;

    async fn refund_payment_intent(&self, payment_intent_id: &str) -> AnyResult<()>;

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<StripeEvent>;
}

#[async_trait]
impl StripeGateway for StripeClient {
    async fn create_customer(&self, email: &str, user_id: Uuid) -> AnyResult<String> {
        self.create_customer(email, user_id).await
    }

    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        customer_id: &str,
        metadata: HashMap<String, String>,
    ) -> AnyResult<StripePaymentIntent> {
        self.create_payment_intent(amount_minor, currency, customer_id, metadata)
            .await
    }

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> AnyResult<StripePaymentIntent> {
        self.retrieve_payment_intent(payment_intent_id).await
    }

    async fn refund_payment_intent(&self, payment_intent_id: &str) -> AnyResult<()> {
        self.refund_payment_intent(payment_intent_id).await
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<StripeEvent> {
        self.verify_webhook_signature(payload, signature)
    }
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Mission not found")]
    MissionNotFound,
    #[error("Payment not found")]
    NotFound,
    #[error("Not authorized")]
    NotAuthorized,
    #[error("mission already has an active payment")]
    AlreadyPaid,
    #[error("Payment not completed")]
    NotCompleted,
    #[error("invalid webhook payload: {0}")]
    InvalidWebhook(String),
    #[error("payment provider request failed")]
    Provider(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::MissionNotFound | PaymentError::NotFound => StatusCode::NOT_FOUND,
            PaymentError::NotAuthorized => StatusCode::FORBIDDEN,
            PaymentError::AlreadyPaid
            | PaymentError::NotCompleted
            | PaymentError::InvalidWebhook(_) => StatusCode::BAD_REQUEST,
            PaymentError::Provider(_) => StatusCode::BAD_GATEWAY,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentError>;

pub struct PaymentUseCase<P, M, U, S>
where
    P: PaymentRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
{
    payment_repo: Arc<P>,
    mission_repo: Arc<M>,
    user_repo: Arc<U>,
    stripe_client: Arc<S>,
}

impl<P, M, U, S> PaymentUseCase<P, M, U, S>
where
    P: PaymentRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
{
    pub fn new(
        payment_repo: Arc<P>,
        mission_repo: Arc<M>,
        user_repo: Arc<U>,
        stripe_client: Arc<S>,
    ) -> Self {
        Self {
            payment_repo,
            mission_repo,
            user_repo,
            stripe_client,
        }
    }

    pub async fn create_intent(
        &self,
        user_id: Uuid,
        mission_id: Uuid,
    ) -> UseCaseResult<PaymentIntentModel> {
        info!(%user_id, %mission_id, "payments: create intent requested");

        let mission = self
            .mission_repo
            .find_by_id(mission_id)
            .await
            .map_err(|err| {
                error!(%mission_id, db_error = ?err, "payments: failed to load mission");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::MissionNotFound)?;

        if mission.client_id != user_id {
            warn!(
                %user_id,
                %mission_id,
                "payments: intent requested by someone other than the mission client"
            );
            return Err(PaymentError::NotAuthorized);
        }

        if let Some(existing) = self
            .payment_repo
            .find_active_by_mission(mission_id)
            .await
            .map_err(|err| {
                error!(%mission_id, db_error = ?err, "payments: failed to check existing payment");
                PaymentError::Internal(err)
            })?
        {
            warn!(
                %mission_id,
                payment_id = %existing.id,
                status = %existing.status,
                "payments: mission already has an active payment"
            );
            return Err(PaymentError::AlreadyPaid);
        }

        // Work in cents from here; splitting euros as floats drifts.
        let amount_minor = (mission.estimated_price * 100.0).round() as i64;
        let commission_minor = (mission.commission * 100.0).round() as i64;
        let provider_minor = amount_minor - commission_minor;

        let client = self
            .user_repo
            .find_by_id(mission.client_id)
            .await
            .map_err(PaymentError::Internal)?
            .ok_or_else(|| {
                PaymentError::Internal(anyhow!("mission client {} not found", mission.client_id))
            })?;

        let customer_id = match client.stripe_customer_id {
            Some(customer_id) => customer_id,
            None => {
                let customer_id = self
                    .stripe_client
                    .create_customer(&client.email, client.id)
                    .await
                    .map_err(|err| {
                        error!(%user_id, error = ?err, "payments: stripe customer creation failed");
                        PaymentError::Provider(err)
                    })?;

                self.user_repo
                    .set_stripe_customer_id(client.id, &customer_id)
                    .await
                    .map_err(PaymentError::Internal)?;

                customer_id
            }
        };

        let metadata = HashMap::from([
            ("mission_id".to_string(), mission.id.to_string()),
            ("client_id".to_string(), mission.client_id.to_string()),
            (
                "provider_id".to_string(),
                mission
                    .provider_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            ),
        ]);

        let intent = self
            .stripe_client
            .create_payment_intent(amount_minor, PLATFORM_CURRENCY, &customer_id, metadata)
            .await
            .map_err(|err| {
                error!(
                    %mission_id,
                    amount_minor,
                    error = ?err,
                    "payments: stripe payment intent creation failed"
                );
                PaymentError::Provider(err)
            })?;

        let client_secret = intent
            .client_secret
            .clone()
            .ok_or_else(|| PaymentError::Provider(anyhow!("payment intent missing client secret")))?;

        // The row exists before Stripe confirms; webhooks and confirm calls
        // only ever update it by the intent reference.
        self.payment_repo
            .create(InsertPaymentEntity {
                id: Uuid::new_v4(),
                amount: mission.estimated_price,
                commission: mission.commission,
                provider_amount: provider_minor as f64 / 100.0,
                currency: PLATFORM_CURRENCY.to_string(),
                status: PaymentStatus::Pending.to_string(),
                stripe_payment_intent: intent.id.clone(),
                mission_id: mission.id,
                user_id: mission.client_id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%mission_id, db_error = ?err, "payments: failed to persist payment row");
                PaymentError::Internal(err)
            })?;

        info!(
            %mission_id,
            payment_intent = %intent.id,
            amount_minor,
            provider_minor,
            "payments: payment intent created"
        );

        Ok(PaymentIntentModel {
            client_secret,
            payment_intent_id: intent.id,
        })
    }

    pub async fn confirm(&self, payment_intent_id: &str) -> UseCaseResult<()> {
        info!(payment_intent = %payment_intent_id, "payments: confirm requested");

        let intent = self
            .stripe_client
            .retrieve_payment_intent(payment_intent_id)
            .await
            .map_err(|err| {
                error!(
                    payment_intent = %payment_intent_id,
                    error = ?err,
                    "payments: failed to retrieve payment intent"
                );
                PaymentError::Provider(err)
            })?;

        if intent.status.as_deref() != Some("succeeded") {
            warn!(
                payment_intent = %payment_intent_id,
                status = ?intent.status,
                "payments: confirm attempted before intent succeeded"
            );
            return Err(PaymentError::NotCompleted);
        }

        let rows = self
            .payment_repo
            .update_status_by_intent(
                payment_intent_id,
                PaymentStatus::Completed,
                intent.latest_charge.clone(),
            )
            .await
            .map_err(PaymentError::Internal)?;

        if rows == 0 {
            return Err(PaymentError::NotFound);
        }

        info!(payment_intent = %payment_intent_id, "payments: payment confirmed");
        Ok(())
    }

    pub async fn history(&self, user_id: Uuid) -> UseCaseResult<Vec<PaymentEntity>> {
        let payments = self
            .payment_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load payment history");
                PaymentError::Internal(err)
            })?;

        Ok(payments)
    }

    pub async fn handle_webhook(&self, payload: &[u8], signature: &str) -> UseCaseResult<()> {
        let event = self
            .stripe_client
            .verify_webhook_signature(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "payments: stripe webhook verification failed");
                PaymentError::InvalidWebhook("signature verification failed".to_string())
            })?;

        info!(event_type = %event.type_, "payments: stripe webhook verified");

        match event.type_.as_str() {
            "payment_intent.succeeded" => {
                self.settle_intent_from_webhook(&event, PaymentStatus::Completed)
                    .await?;
            }
            "payment_intent.payment_failed" => {
                self.settle_intent_from_webhook(&event, PaymentStatus::Failed)
                    .await?;
            }
            _ => {
                debug!("unhandled stripe event type: {}", event.type_);
            }
        }

        Ok(())
    }

    async fn settle_intent_from_webhook(
        &self,
        event: &StripeEvent,
        status: PaymentStatus,
    ) -> UseCaseResult<()> {
        let intent = StripeClient::extract_payment_intent(event).ok_or_else(|| {
            PaymentError::InvalidWebhook("missing payment intent object".to_string())
        })?;

        let rows = self
            .payment_repo
            .update_status_by_intent(&intent.id, status, intent.latest_charge.clone())
            .await
            .map_err(PaymentError::Internal)?;

        if rows == 0 {
            // A retry for an intent we never recorded; nothing to settle.
            info!(
                payment_intent = %intent.id,
                status = %status,
                "payments: webhook matched no payment row, ignoring"
            );
        } else {
            info!(
                payment_intent = %intent.id,
                status = %status,
                rows,
                "payments: webhook settled payment"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        entities::{missions::MissionEntity, users::UserEntity},
        repositories::{
            missions::MockMissionRepository, payments::MockPaymentRepository,
            users::MockUserRepository,
        },
        value_objects::enums::mission_statuses::MissionStatus,
    };
    use crates::payments::stripe_client::StripeEventData;
    use mockall::predicate::eq;

    fn mission(client_id: Uuid) -> MissionEntity {
        MissionEntity {
            id: Uuid::new_v4(),
            title: "Assemble wardrobe".to_string(),
            description: "Two-door wardrobe".to_string(),
            category: "handyman".to_string(),
            is_urgent: false,
            latitude: 48.85,
            longitude: 2.35,
            address: "Paris".to_string(),
            estimated_price: 100.0,
            commission: 15.0,
            status: MissionStatus::Accepted.to_string(),
            client_id,
            provider_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            accepted_at: Some(Utc::now()),
            started_at: None,
            completed_at: None,
            updated_at: Utc::now(),
        }
    }

    fn client_user(id: Uuid, stripe_customer_id: Option<&str>) -> UserEntity {
        UserEntity {
            id,
            email: "client@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone_number: None,
            role: "CLIENT".to_string(),
            profile_image: None,
            latitude: None,
            longitude: None,
            address: None,
            rating: 0.0,
            total_jobs: 0,
            is_available: false,
            stripe_customer_id: stripe_customer_id.map(|s| s.to_string()),
            fcm_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn intent(id: &str, status: &str) -> StripePaymentIntent {
        StripePaymentIntent {
            id: id.to_string(),
            status: Some(status.to_string()),
            client_secret: Some(format!("{}_secret", id)),
            latest_charge: Some("ch_1".to_string()),
        }
    }

    fn succeeded_event(intent_id: &str) -> StripeEvent {
        StripeEvent {
            id: Some("evt_1".to_string()),
            type_: "payment_intent.succeeded".to_string(),
            created: None,
            livemode: Some(false),
            data: StripeEventData {
                object: serde_json::json!({
                    "id": intent_id,
                    "status": "succeeded",
                    "latest_charge": "ch_1",
                }),
            },
        }
    }

    #[tokio::test]
    async fn create_intent_charges_in_minor_units() {
        let client_id = Uuid::new_v4();
        let mission = mission(client_id);
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .with(eq(mission_id))
            .returning(move |_| Ok(Some(mission.clone())));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_active_by_mission()
            .returning(|_| Ok(None));
        payment_repo
            .expect_create()
            .withf(|entity| {
                entity.amount == 100.0
                    && entity.commission == 15.0
                    && entity.provider_amount == 85.0
                    && entity.status == "PENDING"
                    && entity.stripe_payment_intent == "pi_1"
            })
            .returning(|entity| {
                Ok(PaymentEntity {
                    id: entity.id,
                    amount: entity.amount,
                    commission: entity.commission,
                    provider_amount: entity.provider_amount,
                    currency: entity.currency,
                    status: entity.status,
                    stripe_payment_intent: entity.stripe_payment_intent,
                    stripe_charge_id: None,
                    mission_id: entity.mission_id,
                    user_id: entity.user_id,
                    created_at: entity.created_at,
                    updated_at: entity.updated_at,
                })
            });

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(client_user(id, Some("cus_1")))));

        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_create_payment_intent()
            .withf(|amount_minor, currency, customer_id, _| {
                *amount_minor == 10_000 && currency == "eur" && customer_id == "cus_1"
            })
            .returning(|_, _, _, _| Ok(intent("pi_1", "requires_payment_method")));

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(mission_repo),
            Arc::new(user_repo),
            Arc::new(stripe),
        );

        let result = usecase
            .create_intent(client_id, mission_id)
            .await
            .expect("intent should be created");
        assert_eq!(result.payment_intent_id, "pi_1");
        assert_eq!(result.client_secret, "pi_1_secret");
    }

    #[tokio::test]
    async fn create_intent_rejects_non_owner() {
        let mission = mission(Uuid::new_v4());
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mission.clone())));

        let usecase = PaymentUseCase::new(
            Arc::new(MockPaymentRepository::new()),
            Arc::new(mission_repo),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockStripeGateway::new()),
        );

        let result = usecase.create_intent(Uuid::new_v4(), mission_id).await;
        assert!(matches!(result, Err(PaymentError::NotAuthorized)));
    }

    #[tokio::test]
    async fn create_intent_rejects_second_active_payment() {
        let client_id = Uuid::new_v4();
        let mission = mission(client_id);
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mission.clone())));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_active_by_mission()
            .returning(move |mission_id| {
                Ok(Some(PaymentEntity {
                    id: Uuid::new_v4(),
                    amount: 100.0,
                    commission: 15.0,
                    provider_amount: 85.0,
                    currency: "eur".to_string(),
                    status: PaymentStatus::Pending.to_string(),
                    stripe_payment_intent: "pi_existing".to_string(),
                    stripe_charge_id: None,
                    mission_id,
                    user_id: client_id,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                }))
            });

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(mission_repo),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockStripeGateway::new()),
        );

        let result = usecase.create_intent(client_id, mission_id).await;
        assert!(matches!(result, Err(PaymentError::AlreadyPaid)));
    }

    #[tokio::test]
    async fn create_intent_creates_and_caches_stripe_customer() {
        let client_id = Uuid::new_v4();
        let mission = mission(client_id);
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mission.clone())));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_active_by_mission()
            .returning(|_| Ok(None));
        payment_repo.expect_create().returning(|entity| {
            Ok(PaymentEntity {
                id: entity.id,
                amount: entity.amount,
                commission: entity.commission,
                provider_amount: entity.provider_amount,
                currency: entity.currency,
                status: entity.status,
                stripe_payment_intent: entity.stripe_payment_intent,
                stripe_charge_id: None,
                mission_id: entity.mission_id,
                user_id: entity.user_id,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            })
        });

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(client_user(id, None))));
        user_repo
            .expect_set_stripe_customer_id()
            .with(eq(client_id), eq("cus_new"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_create_customer()
            .times(1)
            .returning(|_, _| Ok("cus_new".to_string()));
        stripe
            .expect_create_payment_intent()
            .withf(|_, _, customer_id, _| customer_id == "cus_new")
            .returning(|_, _, _, _| Ok(intent("pi_1", "requires_payment_method")));

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(mission_repo),
            Arc::new(user_repo),
            Arc::new(stripe),
        );

        usecase
            .create_intent(client_id, mission_id)
            .await
            .expect("intent should be created");
    }

    #[tokio::test]
    async fn confirm_rejects_unsettled_intent() {
        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_retrieve_payment_intent()
            .returning(|id| Ok(intent(id, "requires_payment_method")));

        let usecase = PaymentUseCase::new(
            Arc::new(MockPaymentRepository::new()),
            Arc::new(MockMissionRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(stripe),
        );

        let result = usecase.confirm("pi_1").await;
        assert!(matches!(result, Err(PaymentError::NotCompleted)));
    }

    #[tokio::test]
    async fn confirm_updates_payment_by_intent_reference() {
        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_retrieve_payment_intent()
            .returning(|id| Ok(intent(id, "succeeded")));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_update_status_by_intent()
            .withf(|payment_intent, status, charge_id| {
                payment_intent == "pi_1"
                    && *status == PaymentStatus::Completed
                    && charge_id.as_deref() == Some("ch_1")
            })
            .times(1)
            .returning(|_, _, _| Ok(1));

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(MockMissionRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(stripe),
        );

        usecase.confirm("pi_1").await.expect("confirm should pass");
    }

    #[tokio::test]
    async fn confirm_of_unknown_intent_is_not_found() {
        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_retrieve_payment_intent()
            .returning(|id| Ok(intent(id, "succeeded")));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_update_status_by_intent()
            .returning(|_, _, _| Ok(0));

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(MockMissionRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(stripe),
        );

        let result = usecase.confirm("pi_missing").await;
        assert!(matches!(result, Err(PaymentError::NotFound)));
    }

    #[tokio::test]
    async fn webhook_with_bad_signature_is_rejected_unprocessed() {
        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_verify_webhook_signature()
            .returning(|_, _| Err(anyhow!("signature mismatch")));

        // No repository expectations: nothing may be touched.
        let usecase = PaymentUseCase::new(
            Arc::new(MockPaymentRepository::new()),
            Arc::new(MockMissionRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(stripe),
        );

        let result = usecase.handle_webhook(b"{}", "t=1,v1=bad").await;
        assert!(matches!(result, Err(PaymentError::InvalidWebhook(_))));
    }

    #[tokio::test]
    async fn webhook_settles_payment_idempotently_by_intent() {
        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_verify_webhook_signature()
            .returning(|_, _| Ok(succeeded_event("pi_1")));

        let mut payment_repo = MockPaymentRepository::new();
        // Duplicate delivery lands on the same row twice; no insert happens.
        payment_repo
            .expect_update_status_by_intent()
            .withf(|payment_intent, status, _| {
                payment_intent == "pi_1" && *status == PaymentStatus::Completed
            })
            .times(2)
            .returning(|_, _, _| Ok(1));

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(MockMissionRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(stripe),
        );

        usecase
            .handle_webhook(b"{}", "t=1,v1=good")
            .await
            .expect("first delivery should settle");
        usecase
            .handle_webhook(b"{}", "t=1,v1=good")
            .await
            .expect("duplicate delivery must be a benign update");
    }

    #[tokio::test]
    async fn webhook_for_unknown_intent_is_a_noop() {
        let mut stripe = MockStripeGateway::new();
        stripe
            .expect_verify_webhook_signature()
            .returning(|_, _| Ok(succeeded_event("pi_phantom")));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_update_status_by_intent()
            .returning(|_, _, _| Ok(0));

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(MockMissionRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(stripe),
        );

        usecase
            .handle_webhook(b"{}", "t=1,v1=good")
            .await
            .expect("zero matched rows is not an error");
    }

    #[tokio::test]
    async fn webhook_marks_failed_payments() {
        let mut stripe = MockStripeGateway::new();
        stripe.expect_verify_webhook_signature().returning(|_, _| {
            Ok(StripeEvent {
                id: Some("evt_2".to_string()),
                type_: "payment_intent.payment_failed".to_string(),
                created: None,
                livemode: Some(false),
                data: StripeEventData {
                    object: serde_json::json!({"id": "pi_1", "status": "requires_payment_method"}),
                },
            })
        });

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_update_status_by_intent()
            .withf(|_, status, _| *status == PaymentStatus::Failed)
            .times(1)
            .returning(|_, _, _| Ok(1));

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(MockMissionRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(stripe),
        );

        usecase
            .handle_webhook(b"{}", "t=1,v1=good")
            .await
            .expect("failed event should settle");
    }
}
