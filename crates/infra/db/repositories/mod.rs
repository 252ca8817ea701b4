pub mod dashboard;
pub mod messages;
pub mod missions;
pub mod payments;
pub mod users;
