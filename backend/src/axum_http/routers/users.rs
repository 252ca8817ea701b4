use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use crates::{
    domain::{repositories::users::UserRepository, value_objects::iam::UpdateProfileModel},
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
};
use serde::Deserialize;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{error_response, usecase_error_response},
    usecases::users::{DEFAULT_NEARBY_RADIUS_KM, UserUseCase},
};

#[derive(Debug, Deserialize)]
pub struct NearbyProvidersQuery {
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: Option<f64>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserUseCase::new(Arc::new(user_repository));

    Router::new()
        .route("/profile", patch(update_profile))
        .route("/nearby-providers", get(nearby_providers))
        .with_state(Arc::new(user_usecase))
}

pub async fn update_profile<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(update_profile_model): Json<UpdateProfileModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match user_usecase
        .update_profile(user_id, update_profile_model)
        .await
    {
        Ok(user) => Json(user).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn nearby_providers<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    _auth: AuthUser,
    Query(query): Query<NearbyProvidersQuery>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    let (Some(latitude), Some(longitude)) = (query.latitude, query.longitude) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Latitude and longitude required",
        );
    };

    let radius_km = query.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);

    match user_usecase
        .nearby_providers(latitude, longitude, radius_km)
        .await
    {
        Ok(providers) => Json(providers).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}
