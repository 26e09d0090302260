//! # annadata-advisory
//!
//! Single-shot advisories backed by a hosted generative model. Each variant
//! declares its input/output schema, a prompt template, and a static
//! fallback payload; [`Advisor`] validates input, calls the provider, and
//! substitutes the fallback when the upstream call fails.

mod advisor;
mod cache;
mod schema;
pub mod variants;

pub use advisor::{Advice, AdviceSource, Advisor};
pub use cache::AdvisoryCache;
pub use schema::Validate;
pub use variants::Advisory;
