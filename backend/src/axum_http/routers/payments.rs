use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            missions::MissionRepository, payments::PaymentRepository, users::UserRepository,
        },
        value_objects::payments::{ConfirmPaymentModel, CreatePaymentIntentModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            missions::MissionPostgres, payments::PaymentPostgres, users::UserPostgres,
        },
    },
    payments::stripe_client::StripeClient,
};
use serde_json::json;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{error_response, usecase_error_response},
    usecases::payments::{PaymentUseCase, StripeGateway},
};

pub fn routes(db_pool: Arc<PgPoolSquad>, stripe_client: Arc<StripeClient>) -> Router {
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let mission_repository = MissionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));

    let payment_usecase = PaymentUseCase::new(
        Arc::new(payment_repository),
        Arc::new(mission_repository),
        Arc::new(user_repository),
        stripe_client,
    );

    Router::new()
        .route("/create-intent", post(create_intent))
        .route("/confirm", post(confirm))
        .route("/history", get(history))
        .route("/webhook", post(webhook))
        .with_state(Arc::new(payment_usecase))
}

pub async fn create_intent<P, M, U, S>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, M, U, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(create_payment_intent_model): Json<CreatePaymentIntentModel>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
{
    match payment_usecase
        .create_intent(user_id, create_payment_intent_model.mission_id)
        .await
    {
        Ok(intent) => Json(intent).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn confirm<P, M, U, S>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, M, U, S>>>,
    _auth: AuthUser,
    Json(confirm_payment_model): Json<ConfirmPaymentModel>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
{
    match payment_usecase
        .confirm(&confirm_payment_model.payment_intent_id)
        .await
    {
        Ok(()) => Json(json!({ "message": "Payment confirmed" })).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn history<P, M, U, S>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, M, U, S>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
{
    match payment_usecase.history(user_id).await {
        Ok(payments) => Json(payments).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

/// Signed callback from Stripe; never authenticated with a bearer token.
pub async fn webhook<P, M, U, S>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, M, U, S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: StripeGateway + Send + Sync + 'static,
{
    let Some(signature) = headers
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
    else {
        return error_response(StatusCode::BAD_REQUEST, "No signature");
    };

    match payment_usecase.handle_webhook(&body, signature).await {
        Ok(()) => Json(json!({ "received": true })).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}
