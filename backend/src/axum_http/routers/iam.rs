use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::users::UserRepository,
        value_objects::iam::{LoginModel, RegisterUserModel},
    },
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
};

use crate::{
    auth::AuthUser, axum_http::error_responses::usecase_error_response,
    usecases::iam::IamUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let iam_usecase = IamUseCase::new(Arc::new(user_repository));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .with_state(Arc::new(iam_usecase))
}

pub async fn register<U>(
    State(iam_usecase): State<Arc<IamUseCase<U>>>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match iam_usecase.register(register_user_model).await {
        Ok(authenticated) => (StatusCode::CREATED, Json(authenticated)).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn login<U>(
    State(iam_usecase): State<Arc<IamUseCase<U>>>,
    Json(login_model): Json<LoginModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match iam_usecase.login(login_model).await {
        Ok(authenticated) => Json(authenticated).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn profile<U>(
    State(iam_usecase): State<Arc<IamUseCase<U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match iam_usecase.profile(user_id).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}
