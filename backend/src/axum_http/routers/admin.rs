use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::dashboard::DashboardRepository,
        value_objects::{
            dashboard::PageRequestModel,
            enums::{
                mission_statuses::MissionStatus, payment_statuses::PaymentStatus,
                user_roles::Role,
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::dashboard::DashboardPostgres,
    },
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{error_response, usecase_error_response},
    usecases::admin::AdminUseCase,
};

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    role: Option<Role>,
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MissionListQuery {
    status: Option<MissionStatus>,
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    status: Option<PaymentStatus>,
    page: Option<i64>,
    limit: Option<i64>,
}

impl UserListQuery {
    fn page_request(&self) -> PageRequestModel {
        PageRequestModel {
            page: self.page,
            limit: self.limit,
        }
    }
}

impl MissionListQuery {
    fn page_request(&self) -> PageRequestModel {
        PageRequestModel {
            page: self.page,
            limit: self.limit,
        }
    }
}

impl PaymentListQuery {
    fn page_request(&self) -> PageRequestModel {
        PageRequestModel {
            page: self.page,
            limit: self.limit,
        }
    }
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let dashboard_repository = DashboardPostgres::new(Arc::clone(&db_pool));
    let admin_usecase = AdminUseCase::new(Arc::new(dashboard_repository));

    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users))
        .route("/missions", get(list_missions))
        .route("/payments", get(list_payments))
        .with_state(Arc::new(admin_usecase))
}

pub async fn dashboard<D>(
    State(admin_usecase): State<Arc<AdminUseCase<D>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    D: DashboardRepository + Send + Sync + 'static,
{
    if auth.role != Role::Admin {
        return error_response(StatusCode::FORBIDDEN, "Not authorized");
    }

    match admin_usecase.dashboard_stats().await {
        Ok(stats) => Json(json!({ "stats": stats })).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn list_users<D>(
    State(admin_usecase): State<Arc<AdminUseCase<D>>>,
    auth: AuthUser,
    Query(query): Query<UserListQuery>,
) -> impl IntoResponse
where
    D: DashboardRepository + Send + Sync + 'static,
{
    if auth.role != Role::Admin {
        return error_response(StatusCode::FORBIDDEN, "Not authorized");
    }

    match admin_usecase.list_users(query.role, query.page_request()).await {
        Ok((users, pagination)) => {
            Json(json!({ "users": users, "pagination": pagination })).into_response()
        }
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn list_missions<D>(
    State(admin_usecase): State<Arc<AdminUseCase<D>>>,
    auth: AuthUser,
    Query(query): Query<MissionListQuery>,
) -> impl IntoResponse
where
    D: DashboardRepository + Send + Sync + 'static,
{
    if auth.role != Role::Admin {
        return error_response(StatusCode::FORBIDDEN, "Not authorized");
    }

    match admin_usecase.list_missions(query.status, query.page_request()).await {
        Ok((missions, pagination)) => {
            Json(json!({ "missions": missions, "pagination": pagination })).into_response()
        }
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn list_payments<D>(
    State(admin_usecase): State<Arc<AdminUseCase<D>>>,
    auth: AuthUser,
    Query(query): Query<PaymentListQuery>,
) -> impl IntoResponse
where
    D: DashboardRepository + Send + Sync + 'static,
{
    if auth.role != Role::Admin {
        return error_response(StatusCode::FORBIDDEN, "Not authorized");
    }

    match admin_usecase.list_payments(query.status, query.page_request()).await {
        Ok((payments, pagination)) => {
            Json(json!({ "payments": payments, "pagination": pagination })).into_response()
        }
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}
