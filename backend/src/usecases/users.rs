use std::sync::Arc;

use crates::domain::{
    repositories::users::UserRepository,
    value_objects::iam::{ProviderSummaryModel, UpdateProfileModel, UserModel},
};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Haversine distance between two coordinates, in kilometers.
fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UserError>;

pub struct UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update_profile_model: UpdateProfileModel,
    ) -> UseCaseResult<UserModel> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(UserError::Internal)?
            .ok_or(UserError::NotFound)?;

        let user = self
            .user_repo
            .update_profile(user_id, update_profile_model.to_entity())
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to update profile");
                UserError::Internal(err)
            })?;

        info!(%user_id, "users: profile updated");
        Ok(UserModel::from_entity(user))
    }

    /// Available providers within `radius_km` of the given point. The store
    /// pre-filters on availability and presence of a location; the distance
    /// cut happens here.
    pub async fn nearby_providers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> UseCaseResult<Vec<ProviderSummaryModel>> {
        let providers = self
            .user_repo
            .list_available_providers()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to list providers");
                UserError::Internal(err)
            })?;

        let nearby = providers
            .into_iter()
            .filter(|provider| match (provider.latitude, provider.longitude) {
                (Some(lat), Some(lon)) => {
                    distance_km(latitude, longitude, lat, lon) <= radius_km
                }
                _ => false,
            })
            .map(ProviderSummaryModel::from_entity)
            .collect();

        Ok(nearby)
    }
}
