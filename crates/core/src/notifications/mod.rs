//! Outbound notifications.

mod email;

pub use email::{EmailMessage, EmailSender};
