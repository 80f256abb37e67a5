//! Reqwest-backed mail adapter for a JSON send API.
//!
//! The delivery service accepts one POST per message carrying credentials
//! and the rendered content; any non-success HTTP status is a rejection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::info;

use crate::domain::ports::{MailSendError, MailSender};

const DEFAULT_MAIL_TIMEOUT_SECONDS: u64 = 10;

/// One outbound message as the mail API expects it.
#[derive(Debug, Serialize)]
struct MailPayloadDto<'a> {
    apikey: &'a str,
    namespace: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Mail adapter performing HTTP POST requests against one send endpoint.
pub struct HttpMailSender {
    client: Client,
    endpoint: Url,
    api_key: String,
    namespace: String,
}

impl HttpMailSender {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: String,
        namespace: String,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_MAIL_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            namespace,
        })
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailSendError> {
        let payload = MailPayloadDto {
            apikey: self.api_key.as_str(),
            namespace: self.namespace.as_str(),
            to,
            subject,
            body,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|error| MailSendError::transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailSendError::rejected(format!(
                "send returned status {}",
                status.as_u16()
            )));
        }

        info!(to = %to, subject = %subject, "message accepted by mail API");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the wire payload shape.

    use super::*;

    #[test]
    fn payload_uses_the_api_field_names() {
        let payload = MailPayloadDto {
            apikey: "key",
            namespace: "ns",
            to: "reyes@example.gov",
            subject: "subject",
            body: "body",
        };
        let encoded = serde_json::to_value(&payload).expect("payload serialises");
        assert_eq!(
            encoded,
            serde_json::json!({
                "apikey": "key",
                "namespace": "ns",
                "to": "reyes@example.gov",
                "subject": "subject",
                "body": "body",
            })
        );
    }
}
