use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::shared::config::TwilioCredentials;
use crate::shared::errors::NotifyError;
use super::Notifier;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Error body returned by the Twilio REST API
#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    code: Option<u32>,
    message: Option<String>,
}

/// Accepted-message body; only the id is of interest
#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
}

/// WhatsApp messages through the Twilio Messages API
pub struct TwilioNotifier {
    http_client: Client,
    base_url: String,
    credentials: TwilioCredentials,
    channel_prefix: String,
}

impl TwilioNotifier {
    pub fn new(credentials: TwilioCredentials, channel_prefix: impl Into<String>) -> Result<Self, NotifyError> {
        let http_client = Client::builder().timeout(Duration::from_secs(20)).build()?;
        Ok(Self {
            http_client,
            base_url: TWILIO_API_BASE.to_string(),
            credentials,
            channel_prefix: channel_prefix.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Default recipient taken from the credentials
    pub fn default_recipient(&self) -> &str {
        &self.credentials.to
    }

    fn channel(&self, address: &str) -> String {
        if address.starts_with(&self.channel_prefix) {
            address.to_string()
        } else {
            format!("{}{}", self.channel_prefix, address)
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.credentials.account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn notify(&self, message: &str, recipient: &str) -> Result<(), NotifyError> {
        let from = self.channel(&self.credentials.from);
        let to = self.channel(recipient);
        let form = [("Body", message), ("From", from.as_str()), ("To", to.as_str())];

        let response = self
            .http_client
            .post(self.messages_url())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let reason = match serde_json::from_str::<TwilioErrorResponse>(&body) {
                Ok(TwilioErrorResponse { code: Some(code), message: Some(msg) }) => format!("{} (code {})", msg, code),
                Ok(TwilioErrorResponse { message: Some(msg), .. }) => msg,
                _ => body,
            };
            return Err(NotifyError::Rejected { status: status.as_u16(), message: reason });
        }

        match serde_json::from_str::<TwilioMessageResponse>(&body) {
            Ok(accepted) => info!("alert queued as {}", accepted.sid),
            Err(_) => info!("alert accepted"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> TwilioNotifier {
        let credentials = TwilioCredentials {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from: "+14155238886".to_string(),
            to: "whatsapp:+5215512345678".to_string(),
        };
        TwilioNotifier::new(credentials, "whatsapp:").unwrap()
    }

    #[test]
    fn test_channel_prefix_added_once() {
        let n = notifier();
        assert_eq!(n.channel("+14155238886"), "whatsapp:+14155238886");
        assert_eq!(n.channel("whatsapp:+5215512345678"), "whatsapp:+5215512345678");
        assert_eq!(n.default_recipient(), "whatsapp:+5215512345678");
    }

    #[test]
    fn test_messages_url() {
        let n = notifier().with_base_url("http://localhost:8080/");
        assert_eq!(n.messages_url(), "http://localhost:8080/Accounts/AC123/Messages.json");
    }

    #[test]
    fn test_error_body_parses() {
        let body = r#"{"code": 21211, "message": "Invalid 'To' Phone Number", "status": 400}"#;
        let parsed: TwilioErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, Some(21211));
        assert_eq!(parsed.message.as_deref(), Some("Invalid 'To' Phone Number"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        let n = notifier().with_base_url("http://127.0.0.1:9");
        let err = n.notify("hola", "+5215512345678").await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
