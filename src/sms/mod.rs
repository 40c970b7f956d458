//! Outbound SMS through the Twilio REST API, and inbound webhook signatures.

pub mod signature;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::utils::mask_phone;

pub use signature::{AuthError, validate_signature};

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("message request failed")]
    Request(#[from] reqwest::Error),
    #[error("Twilio rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid Twilio API base URL")]
    InvalidUrl(#[from] url::ParseError),
}

/// Sends a text message to a recipient.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), MessageError>;
}

/// Twilio Programmable Messaging client with a fixed sender number.
pub struct TwilioClient {
    http: reqwest::Client,
    messages_url: Url,
    account_sid: String,
    auth_token: String,
    from: String,
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: String,
}

impl TwilioClient {
    pub fn new(
        api_base: &Url,
        account_sid: String,
        auth_token: String,
        from: String,
    ) -> Result<Self, MessageError> {
        let messages_url =
            api_base.join(&format!("2010-04-01/Accounts/{account_sid}/Messages.json"))?;
        Ok(Self {
            http: reqwest::Client::new(),
            messages_url,
            account_sid,
            auth_token,
            from,
        })
    }

    pub fn messages_url(&self) -> &Url {
        &self.messages_url
    }
}

#[async_trait]
impl MessageSender for TwilioClient {
    async fn send(&self, to: &str, body: &str) -> Result<(), MessageError> {
        let resp = self
            .http
            .post(self.messages_url.clone())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", self.from.as_str()), ("To", to), ("Body", body)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorBody>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(MessageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let message: TwilioMessage = resp.json().await?;
        info!(to = mask_phone(to), sid = %message.sid, "Sent reply");
        debug!(body, status = ?message.status, "Reply details");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let client = TwilioClient::new(
            &Url::parse("https://api.twilio.com").unwrap(),
            "AC123".to_owned(),
            "token".to_owned(),
            "+18182908210".to_owned(),
        )
        .unwrap();
        assert_eq!(
            client.messages_url().as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
