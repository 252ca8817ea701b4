use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use crates::{
    domain::{
        repositories::{
            missions::MissionRepository, payments::PaymentRepository, users::UserRepository,
        },
        value_objects::{
            enums::user_roles::Role,
            missions::{
                InsertMissionModel, MissionFilter, ParticipantSide, UpdateMissionStatusModel,
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            missions::MissionPostgres, payments::PaymentPostgres, users::UserPostgres,
        },
    },
    notifications::fcm_client::FcmClient,
    payments::stripe_client::StripeClient,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{error_response, usecase_error_response},
    config::config_model::DotEnvyConfig,
    usecases::{
        missions::{MissionUseCase, PushNotifier},
        payments::StripeGateway,
    },
};

#[derive(Debug, Deserialize)]
pub struct UserMissionsQuery {
    role: Option<ParticipantSide>,
}

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    config: Arc<DotEnvyConfig>,
    stripe_client: Arc<StripeClient>,
    fcm_client: Arc<FcmClient>,
) -> Router {
    let mission_repository = MissionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));

    let mission_usecase = MissionUseCase::new(
        Arc::new(mission_repository),
        Arc::new(user_repository),
        Arc::new(payment_repository),
        stripe_client,
        fcm_client,
        config.commission_rate,
    );

    Router::new()
        .route("/", post(create).get(list))
        .route("/user", get(list_user_missions))
        .route("/:id", get(get_mission))
        .route("/:id/accept", post(accept))
        .route("/:id/status", patch(update_status))
        .route("/:id/cancel", post(cancel))
        .with_state(Arc::new(mission_usecase))
}

pub async fn create<M, U, P, S, N>(
    State(mission_usecase): State<Arc<MissionUseCase<M, U, P, S, N>>>,
    auth: AuthUser,
    Json(insert_mission_model): Json<InsertMissionModel>,
) -> impl IntoResponse
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    if auth.role != Role::Client {
        return error_response(StatusCode::FORBIDDEN, "Not authorized");
    }

    match mission_usecase.create(auth.user_id, insert_mission_model).await {
        Ok(mission) => (StatusCode::CREATED, Json(mission)).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn list<M, U, P, S, N>(
    State(mission_usecase): State<Arc<MissionUseCase<M, U, P, S, N>>>,
    _auth: AuthUser,
    Query(filter): Query<MissionFilter>,
) -> impl IntoResponse
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    match mission_usecase.list(filter).await {
        Ok(missions) => Json(missions).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn list_user_missions<M, U, P, S, N>(
    State(mission_usecase): State<Arc<MissionUseCase<M, U, P, S, N>>>,
    AuthUser { user_id, .. }: AuthUser,
    Query(query): Query<UserMissionsQuery>,
) -> impl IntoResponse
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    match mission_usecase.list_for_user(user_id, query.role).await {
        Ok(missions) => Json(missions).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn get_mission<M, U, P, S, N>(
    State(mission_usecase): State<Arc<MissionUseCase<M, U, P, S, N>>>,
    _auth: AuthUser,
    Path(mission_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    match mission_usecase.get(mission_id).await {
        Ok(mission) => Json(mission).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn accept<M, U, P, S, N>(
    State(mission_usecase): State<Arc<MissionUseCase<M, U, P, S, N>>>,
    auth: AuthUser,
    Path(mission_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    if auth.role != Role::Provider {
        return error_response(StatusCode::FORBIDDEN, "Not authorized");
    }

    match mission_usecase.accept(mission_id, auth.user_id).await {
        Ok(mission) => Json(mission).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn update_status<M, U, P, S, N>(
    State(mission_usecase): State<Arc<MissionUseCase<M, U, P, S, N>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(mission_id): Path<Uuid>,
    Json(update_mission_status_model): Json<UpdateMissionStatusModel>,
) -> impl IntoResponse
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    match mission_usecase
        .update_status(mission_id, user_id, update_mission_status_model.status)
        .await
    {
        Ok(mission) => Json(mission).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn cancel<M, U, P, S, N>(
    State(mission_usecase): State<Arc<MissionUseCase<M, U, P, S, N>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(mission_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
    N: PushNotifier + Send + Sync + 'static,
{
    match mission_usecase.cancel(mission_id, user_id).await {
        Ok(mission) => Json(mission).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}
