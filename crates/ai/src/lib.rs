//! AI insight generation for Coinfolio.
//!
//! Talks to an OpenAI-compatible chat completions endpoint (DeepSeek by
//! default) and turns the model's JSON answer into a
//! [`coinfolio_core::insights::Insight`].

mod deepseek;
mod error;
mod prompt;

pub use deepseek::{DeepSeekInsightGenerator, InsightGeneratorConfig, DEEPSEEK_BASE_URL, DEEPSEEK_MODEL};
pub use error::AiError;
