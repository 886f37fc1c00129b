//! Email digest job.
//!
//! Selects users whose preferences and plan make them eligible right now,
//! values their holdings at the latest prices, renders an HTML summary and
//! sends it. Each user is processed independently; one user's failure never
//! stops the run.

mod digest_model;
mod digest_render;
mod digest_service;
mod digest_traits;
mod eligibility;

#[cfg(test)]
mod digest_service_tests;

pub use digest_model::{
    DigestConfig, DigestFrequency, DigestPreference, DigestPreferenceUpdate, DigestRunSummary,
    DigestSnapshot,
};
pub use digest_render::{escape_html, render_digest_email};
pub use digest_service::DigestService;
pub use digest_traits::{DigestPreferenceRepositoryTrait, DigestServiceTrait};
pub use eligibility::{evaluate_eligibility, Eligibility};
