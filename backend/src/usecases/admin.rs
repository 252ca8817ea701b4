use std::sync::Arc;

use crates::domain::{
    entities::{missions::MissionEntity, payments::PaymentEntity},
    repositories::dashboard::DashboardRepository,
    value_objects::{
        dashboard::{DashboardStatsModel, PageRequestModel, PaginationModel},
        enums::{
            mission_statuses::MissionStatus, payment_statuses::PaymentStatus, user_roles::Role,
        },
        iam::UserModel,
    },
};
use thiserror::Error;
use tracing::error;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AdminError>;

fn normalize(page_request: PageRequestModel) -> (i64, i64) {
    let page = page_request.page.unwrap_or(1).max(1);
    let limit = page_request
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

pub struct AdminUseCase<D>
where
    D: DashboardRepository + Send + Sync + 'static,
{
    dashboard_repo: Arc<D>,
}

impl<D> AdminUseCase<D>
where
    D: DashboardRepository + Send + Sync + 'static,
{
    pub fn new(dashboard_repo: Arc<D>) -> Self {
        Self { dashboard_repo }
    }

    pub async fn dashboard_stats(&self) -> UseCaseResult<DashboardStatsModel> {
        let stats = self.dashboard_repo.dashboard_stats().await.map_err(|err| {
            error!(db_error = ?err, "admin: failed to load dashboard stats");
            AdminError::Internal(err)
        })?;

        Ok(stats)
    }

    pub async fn list_users(
        &self,
        role: Option<Role>,
        page_request: PageRequestModel,
    ) -> UseCaseResult<(Vec<UserModel>, PaginationModel)> {
        let (page, limit) = normalize(page_request);

        let (users, total) = self
            .dashboard_repo
            .list_users(role, page, limit)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "admin: failed to list users");
                AdminError::Internal(err)
            })?;

        let users = users.into_iter().map(UserModel::from_entity).collect();
        Ok((users, PaginationModel::new(total, page, limit)))
    }

    pub async fn list_missions(
        &self,
        status: Option<MissionStatus>,
        page_request: PageRequestModel,
    ) -> UseCaseResult<(Vec<MissionEntity>, PaginationModel)> {
        let (page, limit) = normalize(page_request);

        let (missions, total) = self
            .dashboard_repo
            .list_missions(status, page, limit)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "admin: failed to list missions");
                AdminError::Internal(err)
            })?;

        Ok((missions, PaginationModel::new(total, page, limit)))
    }

    pub async fn list_payments(
        &self,
        status: Option<PaymentStatus>,
        page_request: PageRequestModel,
    ) -> UseCaseResult<(Vec<PaymentEntity>, PaginationModel)> {
        let (page, limit) = normalize(page_request);

        let (payments, total) = self
            .dashboard_repo
            .list_payments(status, page, limit)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "admin: failed to list payments");
                AdminError::Internal(err)
            })?;

        Ok((payments, PaginationModel::new(total, page, limit)))
    }
}
