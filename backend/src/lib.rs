//! Economic-indicator alert backend library modules.
//!
//! The pipeline lives in [`domain`]; [`outbound`] adapts it to the feed,
//! PostgreSQL, the mail API, and the template directory; [`inbound`] and
//! [`server`] drive it from HTTP and the scheduler.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
