pub mod mission_statuses;
pub mod payment_statuses;
pub mod user_roles;
