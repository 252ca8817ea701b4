use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::users::{InsertUserEntity, UpdateUserProfileEntity, UserEntity},
    value_objects::enums::user_roles::Role,
};

/// Public view of a user; the credential hash never leaves the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub profile_image: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub rating: f64,
    pub total_jobs: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    pub fn from_entity(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone_number: entity.phone_number,
            role: Role::from_str(&entity.role).unwrap_or(Role::Client),
            profile_image: entity.profile_image,
            latitude: entity.latitude,
            longitude: entity.longitude,
            address: entity.address,
            rating: entity.rating,
            total_jobs: entity.total_jobs,
            is_available: entity.is_available,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserModel {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: Option<Role>,
}

impl RegisterUserModel {
    pub fn to_entity(&self, password_hash: String) -> InsertUserEntity {
        InsertUserEntity {
            id: Uuid::new_v4(),
            email: self.email.clone(),
            password_hash,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role.unwrap_or(Role::Client).to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedModel {
    pub token: String,
    pub user: UserModel,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileModel {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub is_available: Option<bool>,
    pub fcm_token: Option<String>,
}

impl UpdateProfileModel {
    pub fn to_entity(&self) -> UpdateUserProfileEntity {
        UpdateUserProfileEntity {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone_number: self.phone_number.clone(),
            profile_image: self.profile_image.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address.clone(),
            is_available: self.is_available,
            fcm_token: self.fcm_token.clone(),
            updated_at: Utc::now(),
        }
    }
}

/// What a client browsing nearby providers is allowed to see.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSummaryModel {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub rating: f64,
    pub total_jobs: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ProviderSummaryModel {
    pub fn from_entity(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            rating: entity.rating,
            total_jobs: entity.total_jobs,
            latitude: entity.latitude,
            longitude: entity.longitude,
        }
    }
}
