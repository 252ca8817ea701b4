use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::error;

const FCM_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Push delivery is best-effort everywhere it is used; the short timeout
/// keeps a slow FCM from stalling the request that triggered the push.
pub struct FcmClient {
    http: reqwest::Client,
    server_key: String,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    to: &'a str,
    notification: FcmNotification<'a>,
    data: &'a HashMap<String, String>,
}

impl FcmClient {
    pub fn new(server_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { http, server_key })
    }

    pub async fn send_push(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> Result<()> {
        let message = FcmMessage {
            to: device_token,
            notification: FcmNotification { title, body },
            data: &data,
        };

        let resp = self
            .http
            .post(FCM_SEND_URL)
            .header(AUTHORIZATION, format!("key={}", self.server_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&message)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let response_body = resp.text().await.unwrap_or_default();
            error!(
                status = %status,
                response_body = %response_body,
                "fcm send request failed"
            );
            anyhow::bail!("FCM send failed with status {}", status);
        }

        Ok(())
    }
}
