//! Outbound alert delivery

mod log_notifier;
mod twilio_notifier;

pub use log_notifier::LogNotifier;
pub use twilio_notifier::TwilioNotifier;

use async_trait::async_trait;

use crate::shared::errors::NotifyError;

/// Fire-and-forget alert channel. No retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str, recipient: &str) -> Result<(), NotifyError>;
}
