use std::{collections::HashMap, sync::Arc};

use anyhow::{Result as AnyResult, anyhow};
use async_trait::async_trait;
use crates::{
    domain::{
        entities::missions::MissionEntity,
        repositories::{
            missions::MissionRepository, payments::PaymentRepository, users::UserRepository,
        },
        value_objects::{
            enums::{
                mission_statuses::{MissionStatus, TransitionActor},
                payment_statuses::PaymentStatus,
            },
            missions::{InsertMissionModel, MissionFilter, ParticipantSide},
        },
    },
    notifications::fcm_client::FcmClient,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::usecases::payments::StripeGateway;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn send_push(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> AnyResult<()>;
}

#[async_trait]
impl PushNotifier for FcmClient {
    async fn send_push(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> AnyResult<()> {
        self.send_push(device_token, title, body, data).await
    }
}

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("estimated price must be a positive number")]
    InvalidPrice,
    #[error("Mission not found")]
    NotFound,
    #[error("Mission is not available")]
    NotAvailable,
    #[error("Not authorized")]
    NotAuthorized,
    #[error("cannot move mission from {from} to {to}")]
    InvalidTransition {
        from: MissionStatus,
        to: MissionStatus,
    },
    #[error("payment provider request failed")]
    Provider(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MissionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MissionError::InvalidPrice
            | MissionError::NotAvailable
            | MissionError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            MissionError::NotFound => StatusCode::NOT_FOUND,
            MissionError::NotAuthorized => StatusCode::FORBIDDEN,
            MissionError::Provider(_) => StatusCode::BAD_GATEWAY,
            MissionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, MissionError>;

pub struct MissionUseCase<M, U, P, S, N>
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    mission_repo: Arc<M>,
    user_repo: Arc<U>,
    payment_repo: Arc<P>,
    stripe_client: Arc<S>,
    notifier: Arc<N>,
    commission_rate: f64,
}

impl<M, U, P, S, N> MissionUseCase<M, U, P, S, N>
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    pub fn new(
        mission_repo: Arc<M>,
        user_repo: Arc<U>,
        payment_repo: Arc<P>,
        stripe_client: Arc<S>,
        notifier: Arc<N>,
        commission_rate: f64,
    ) -> Self {
        Self {
            mission_repo,
            user_repo,
            payment_repo,
            stripe_client,
            notifier,
            commission_rate,
        }
    }

    pub async fn create(
        &self,
        client_id: Uuid,
        insert_mission_model: InsertMissionModel,
    ) -> UseCaseResult<MissionEntity> {
        if !insert_mission_model.estimated_price.is_finite()
            || insert_mission_model.estimated_price <= 0.0
        {
            return Err(MissionError::InvalidPrice);
        }

        let entity = insert_mission_model.to_entity(client_id, self.commission_rate);
        let mission = self.mission_repo.create(entity).await.map_err(|err| {
            error!(%client_id, db_error = ?err, "missions: failed to create mission");
            MissionError::Internal(err)
        })?;

        info!(
            mission_id = %mission.id,
            %client_id,
            commission = mission.commission,
            "missions: mission created"
        );

        Ok(mission)
    }

    pub async fn list(&self, filter: MissionFilter) -> UseCaseResult<Vec<MissionEntity>> {
        let missions = self.mission_repo.list(filter).await.map_err(|err| {
            error!(db_error = ?err, "missions: failed to list missions");
            MissionError::Internal(err)
        })?;

        Ok(missions)
    }

    pub async fn get(&self, mission_id: Uuid) -> UseCaseResult<MissionEntity> {
        self.mission_repo
            .find_by_id(mission_id)
            .await
            .map_err(|err| {
                error!(%mission_id, db_error = ?err, "missions: failed to load mission");
                MissionError::Internal(err)
            })?
            .ok_or(MissionError::NotFound)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        side: Option<ParticipantSide>,
    ) -> UseCaseResult<Vec<MissionEntity>> {
        let missions = self
            .mission_repo
            .list_by_participant(user_id, side)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "missions: failed to list user missions");
                MissionError::Internal(err)
            })?;

        Ok(missions)
    }

    /// Claims a PENDING mission for the provider. The status check and the
    /// assignment are one conditional update, so concurrent accepts resolve
    /// to exactly one winner.
    pub async fn accept(
        &self,
        mission_id: Uuid,
        provider_id: Uuid,
    ) -> UseCaseResult<MissionEntity> {
        info!(%mission_id, %provider_id, "missions: accept requested");

        let accepted = self
            .mission_repo
            .accept_if_pending(mission_id, provider_id)
            .await
            .map_err(|err| {
                error!(%mission_id, db_error = ?err, "missions: accept update failed");
                MissionError::Internal(err)
            })?;

        let mission = match accepted {
            Some(mission) => mission,
            None => {
                // Lost the race or never existed; look once to tell which.
                return match self
                    .mission_repo
                    .find_by_id(mission_id)
                    .await
                    .map_err(MissionError::Internal)?
                {
                    Some(_) => Err(MissionError::NotAvailable),
                    None => Err(MissionError::NotFound),
                };
            }
        };

        info!(%mission_id, %provider_id, "missions: mission accepted");

        self.notify_user(
            mission.client_id,
            "Mission Accepted",
            &format!("Your mission \"{}\" has been accepted", mission.title),
            mission.id,
        )
        .await;

        Ok(mission)
    }

    pub async fn update_status(
        &self,
        mission_id: Uuid,
        actor_id: Uuid,
        new_status: MissionStatus,
    ) -> UseCaseResult<MissionEntity> {
        info!(%mission_id, %actor_id, status = %new_status, "missions: status update requested");

        let mission = self
            .mission_repo
            .find_by_id(mission_id)
            .await
            .map_err(MissionError::Internal)?
            .ok_or(MissionError::NotFound)?;

        let is_client = mission.client_id == actor_id;
        let is_provider = mission.provider_id == Some(actor_id);
        if !is_client && !is_provider {
            warn!(%mission_id, %actor_id, "missions: status update by non-participant");
            return Err(MissionError::NotAuthorized);
        }

        let current = MissionStatus::from_str(&mission.status).ok_or_else(|| {
            MissionError::Internal(anyhow!(
                "mission {} has unknown status {}",
                mission.id,
                mission.status
            ))
        })?;

        let required_actor = MissionStatus::transition_actor(current, new_status).ok_or(
            MissionError::InvalidTransition {
                from: current,
                to: new_status,
            },
        )?;

        if required_actor == TransitionActor::ProviderOnly && !is_provider {
            warn!(
                %mission_id,
                %actor_id,
                status = %new_status,
                "missions: provider-only transition requested by client"
            );
            return Err(MissionError::NotAuthorized);
        }

        if new_status == MissionStatus::Cancelled {
            return self.cancel(mission_id, actor_id).await;
        }

        let updated = match new_status {
            MissionStatus::InProgress => self
                .mission_repo
                .start_if_accepted(mission_id)
                .await
                .map_err(MissionError::Internal)?,
            MissionStatus::Completed => {
                let provider_id = mission.provider_id.ok_or_else(|| {
                    MissionError::Internal(anyhow!(
                        "mission {} is in progress without a provider",
                        mission.id
                    ))
                })?;
                self.mission_repo
                    .complete_if_in_progress(mission_id, provider_id)
                    .await
                    .map_err(MissionError::Internal)?
            }
            _ => None,
        };

        let mission = updated.ok_or(MissionError::InvalidTransition {
            from: current,
            to: new_status,
        })?;

        info!(%mission_id, status = %new_status, "missions: status updated");

        self.notify_counterparty(&mission, actor_id, new_status).await;

        Ok(mission)
    }

    /// Cancels a mission from any non-terminal state. A captured payment is
    /// refunded through the payment provider and its row marked REFUNDED.
    pub async fn cancel(&self, mission_id: Uuid, actor_id: Uuid) -> UseCaseResult<MissionEntity> {
        info!(%mission_id, %actor_id, "missions: cancel requested");

        let mission = self
            .mission_repo
            .find_by_id(mission_id)
            .await
            .map_err(MissionError::Internal)?
            .ok_or(MissionError::NotFound)?;

        if mission.client_id != actor_id && mission.provider_id != Some(actor_id) {
            warn!(%mission_id, %actor_id, "missions: cancel by non-participant");
            return Err(MissionError::NotAuthorized);
        }

        let current = MissionStatus::from_str(&mission.status).ok_or_else(|| {
            MissionError::Internal(anyhow!(
                "mission {} has unknown status {}",
                mission.id,
                mission.status
            ))
        })?;

        if MissionStatus::transition_actor(current, MissionStatus::Cancelled).is_none() {
            return Err(MissionError::InvalidTransition {
                from: current,
                to: MissionStatus::Cancelled,
            });
        }

        let cancelled = self
            .mission_repo
            .cancel_if_active(mission_id)
            .await
            .map_err(MissionError::Internal)?
            .ok_or(MissionError::InvalidTransition {
                from: current,
                to: MissionStatus::Cancelled,
            })?;

        self.refund_captured_payment(mission_id).await?;

        info!(%mission_id, "missions: mission cancelled");

        self.notify_counterparty(&cancelled, actor_id, MissionStatus::Cancelled)
            .await;

        Ok(cancelled)
    }

    async fn refund_captured_payment(&self, mission_id: Uuid) -> UseCaseResult<()> {
        let Some(payment) = self
            .payment_repo
            .find_active_by_mission(mission_id)
            .await
            .map_err(MissionError::Internal)?
        else {
            return Ok(());
        };

        if PaymentStatus::from_str(&payment.status) != Some(PaymentStatus::Completed) {
            // An unsettled intent will be resolved by the webhook; nothing
            // to give back yet.
            debug!(
                %mission_id,
                payment_status = %payment.status,
                "missions: no captured payment to refund"
            );
            return Ok(());
        }

        self.stripe_client
            .refund_payment_intent(&payment.stripe_payment_intent)
            .await
            .map_err(|err| {
                error!(
                    %mission_id,
                    payment_intent = %payment.stripe_payment_intent,
                    error = ?err,
                    "missions: refund request failed"
                );
                MissionError::Provider(err)
            })?;

        self.payment_repo
            .update_status_by_intent(
                &payment.stripe_payment_intent,
                PaymentStatus::Refunded,
                None,
            )
            .await
            .map_err(MissionError::Internal)?;

        info!(
            %mission_id,
            payment_intent = %payment.stripe_payment_intent,
            "missions: captured payment refunded"
        );

        Ok(())
    }

    async fn notify_counterparty(
        &self,
        mission: &MissionEntity,
        actor_id: Uuid,
        new_status: MissionStatus,
    ) {
        let recipient = if mission.client_id == actor_id {
            mission.provider_id
        } else {
            Some(mission.client_id)
        };

        let Some(recipient) = recipient else {
            return;
        };

        self.notify_user(
            recipient,
            "Mission Status Updated",
            &format!("Mission \"{}\" is now {}", mission.title, new_status),
            mission.id,
        )
        .await;
    }

    /// Push delivery is fire-and-forget: any failure is logged and the
    /// triggering operation still succeeds.
    async fn notify_user(&self, user_id: Uuid, title: &str, body: &str, mission_id: Uuid) {
        let user = match self.user_repo.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(%user_id, "missions: push recipient does not exist");
                return;
            }
            Err(err) => {
                warn!(%user_id, db_error = ?err, "missions: failed to load push recipient");
                return;
            }
        };

        let Some(device_token) = user.fcm_token else {
            debug!(%user_id, "missions: push recipient has no device token");
            return;
        };

        let data = HashMap::from([("mission_id".to_string(), mission_id.to_string())]);
        if let Err(err) = self.notifier.send_push(&device_token, title, body, data).await {
            warn!(%user_id, %mission_id, error = ?err, "missions: push notification failed");
        }
    }
}
