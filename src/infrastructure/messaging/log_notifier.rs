use async_trait::async_trait;
use tracing::info;

use crate::shared::errors::NotifyError;
use super::Notifier;

/// Dry-run notifier: writes the alert to the log instead of sending it
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str, recipient: &str) -> Result<(), NotifyError> {
        info!("[dry-run] alert for {}: {}", recipient, message.replace('\n', " | "));
        Ok(())
    }
}
