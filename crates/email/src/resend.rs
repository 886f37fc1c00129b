//! Resend (<https://resend.com>) email client.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use coinfolio_core::notifications::{EmailMessage, EmailSender};

use crate::error::{EmailError, Result};

pub const RESEND_API_URL: &str = "https://api.resend.com/emails";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ResendErrorResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResendEmailSender {
    client: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl ResendEmailSender {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_endpoint(RESEND_API_URL, api_key)
    }

    /// Sender posting to a custom endpoint, e.g. a local stand-in.
    pub fn with_endpoint(endpoint: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            headers: Self::headers(api_key)?,
        })
    }

    fn headers(api_key: &str) -> Result<HeaderMap> {
        if api_key.trim().is_empty() {
            return Err(EmailError::Config("Resend API key is empty".to_string()));
        }
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| EmailError::Config("Invalid Resend API key format".to_string()))?;
        headers.insert(AUTHORIZATION, auth_value);
        Ok(headers)
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<Option<String>> {
        let body = SendEmailRequest {
            from: &message.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ResendErrorResponse>(&text)
                .ok()
                .and_then(|e| match (e.name, e.message) {
                    (Some(name), Some(msg)) => Some(format!("{}: {}", name, msg)),
                    (None, Some(msg)) => Some(msg),
                    _ => None,
                })
                .unwrap_or(text);
            return Err(EmailError::api(status.as_u16(), message));
        }

        Ok(serde_json::from_str::<SendEmailResponse>(&text)
            .ok()
            .and_then(|r| r.id))
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    fn id(&self) -> &'static str {
        "RESEND"
    }

    async fn send(&self, message: &EmailMessage) -> coinfolio_core::Result<()> {
        match self.deliver(message).await {
            Ok(id) => {
                debug!(
                    "Resend accepted email to {} (id: {})",
                    message.to,
                    id.as_deref().unwrap_or("unknown")
                );
                Ok(())
            }
            Err(e) => {
                warn!("Resend rejected email to {}: {}", message.to, e);
                Err(e.into())
            }
        }
    }
}
