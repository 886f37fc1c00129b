//! Email senders for Coinfolio.
//!
//! [`ResendEmailSender`] delivers through the Resend HTTP API.
//! [`LogEmailSender`] only logs, and is used when no API key is configured.

mod error;
mod log_sender;
mod resend;

pub use error::{EmailError, Result};
pub use log_sender::LogEmailSender;
pub use resend::{ResendEmailSender, RESEND_API_URL};
