pub mod config;
pub mod error;
pub mod evaluation;
pub mod providers;
pub mod router;
pub mod service;
pub mod statistics;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use evaluation::{normalize, InvalidInputError, NormalizedEvaluation};
pub use router::coaching_router;
pub use service::{PitchCoachService, ServiceError};
