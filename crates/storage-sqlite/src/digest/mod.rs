mod model;
mod repository;

pub use model::DigestPreferenceDB;
pub use repository::DigestPreferenceRepository;
