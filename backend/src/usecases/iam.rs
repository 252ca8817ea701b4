use std::sync::Arc;

use crates::domain::{
    repositories::users::UserRepository,
    value_objects::iam::{AuthenticatedModel, LoginModel, RegisterUserModel, UserModel},
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth;

#[derive(Debug, Error)]
pub enum IamError {
    #[error("User already exists")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IamError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            IamError::EmailTaken => StatusCode::BAD_REQUEST,
            IamError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            IamError::NotFound => StatusCode::NOT_FOUND,
            IamError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, IamError>;

pub struct IamUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> IamUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn register(
        &self,
        register_user_model: RegisterUserModel,
    ) -> UseCaseResult<AuthenticatedModel> {
        let existing = self
            .user_repo
            .find_by_email(&register_user_model.email)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "iam: failed to check existing email");
                IamError::Internal(err)
            })?;

        if existing.is_some() {
            warn!(email = %register_user_model.email, "iam: registration with taken email");
            return Err(IamError::EmailTaken);
        }

        let password_hash = auth::hash_password(&register_user_model.password)
            .map_err(IamError::Internal)?;

        let user = self
            .user_repo
            .register(register_user_model.to_entity(password_hash))
            .await
            .map_err(|err| {
                error!(db_error = ?err, "iam: failed to register user");
                IamError::Internal(err)
            })?;

        let user = UserModel::from_entity(user);
        let token = auth::generate_token(user.id, user.role).map_err(IamError::Internal)?;

        info!(user_id = %user.id, role = %user.role, "iam: user registered");

        Ok(AuthenticatedModel { token, user })
    }

    pub async fn login(&self, login_model: LoginModel) -> UseCaseResult<AuthenticatedModel> {
        let user = self
            .user_repo
            .find_by_email(&login_model.email)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "iam: failed to load user for login");
                IamError::Internal(err)
            })?
            // Same answer for unknown email and wrong password.
            .ok_or(IamError::InvalidCredentials)?;

        if !auth::verify_password(&login_model.password, &user.password_hash) {
            warn!(user_id = %user.id, "iam: login with wrong password");
            return Err(IamError::InvalidCredentials);
        }

        let user = UserModel::from_entity(user);
        let token = auth::generate_token(user.id, user.role).map_err(IamError::Internal)?;

        info!(user_id = %user.id, "iam: user logged in");

        Ok(AuthenticatedModel { token, user })
    }

    pub async fn profile(&self, user_id: Uuid) -> UseCaseResult<UserModel> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "iam: failed to load profile");
                IamError::Internal(err)
            })?
            .ok_or(IamError::NotFound)?;

        Ok(UserModel::from_entity(user))
    }
}
