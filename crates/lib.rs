pub mod domain;
pub mod infra;
pub mod notifications;
pub mod observability;
pub mod payments;
pub mod realtime;
