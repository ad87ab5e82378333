//! Release publishing
//!
//! - **changelog**: deduplicated commit list between the previous tag and this one
//! - **github**: release/asset endpoints, JSON payloads and the HTTP transport
//! - **publisher**: the Resolve -> Describe -> Create -> Upload sequence

pub mod changelog;
pub mod github;
pub mod publisher;

pub use publisher::{PublishReport, publish};
