pub mod fcm_client;
