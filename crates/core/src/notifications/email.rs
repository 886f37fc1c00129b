use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// A rendered email ready to hand to a transport.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivers rendered emails. Failures surface as [`crate::Error::Email`].
#[async_trait]
pub trait EmailSender: Send + Sync {
    fn id(&self) -> &'static str;
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}
