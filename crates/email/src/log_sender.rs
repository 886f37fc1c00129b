use async_trait::async_trait;
use log::info;

use coinfolio_core::notifications::{EmailMessage, EmailSender};

/// Development sender: logs the message instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    fn id(&self) -> &'static str {
        "LOG"
    }

    async fn send(&self, message: &EmailMessage) -> coinfolio_core::Result<()> {
        info!(
            "Email delivery disabled, would send '{}' from {} to {} ({} bytes of HTML)",
            message.subject,
            message.from,
            message.to,
            message.html.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        let message = EmailMessage {
            from: "a@example.com".to_string(),
            to: "b@example.com".to_string(),
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        assert!(LogEmailSender.send(&message).await.is_ok());
    }
}
