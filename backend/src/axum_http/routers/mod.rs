pub mod admin;
pub mod chat;
pub mod iam;
pub mod missions;
pub mod payments;
pub mod users;
