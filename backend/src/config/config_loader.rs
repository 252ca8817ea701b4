use anyhow::{Ok, Result};

use crate::config::{
    config_model::{DotEnvyConfig, JwtSecret},
    stage::Stage,
};

const DEFAULT_COMMISSION_RATE: f64 = 0.15;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = super::config_model::Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let stripe = super::config_model::Stripe {
        secret_key: std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY is invalid"),
        webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
            .expect("STRIPE_WEBHOOK_SECRET is invalid"),
    };

    let fcm = super::config_model::Fcm {
        server_key: std::env::var("FCM_SERVER_KEY").expect("FCM_SERVER_KEY is invalid"),
    };

    let commission_rate = std::env::var("COMMISSION_RATE")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_COMMISSION_RATE);

    Ok(DotEnvyConfig {
        server,
        database,
        stripe,
        fcm,
        commission_rate,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(stage_str.as_str()).unwrap_or_default()
}

pub fn get_jwt_secret() -> Result<JwtSecret> {
    dotenvy::dotenv().ok();

    Ok(JwtSecret {
        secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
        expiry_days: std::env::var("JWT_EXPIRY_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()?,
    })
}
