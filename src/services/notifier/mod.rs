//! Outbound notification channel.

pub mod message;
pub mod telegram;

pub use message::{format_shutdown_message, format_signal_message, format_startup_message};
pub use telegram::{TelegramConfig, TelegramNotifier};

use crate::error::NotifyError;
use tracing::info;

#[async_trait::async_trait]
pub trait Notifier {
    /// Deliver one formatted message.
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        info!(message = %text, "Notification (log only)");
        Ok(())
    }
}
