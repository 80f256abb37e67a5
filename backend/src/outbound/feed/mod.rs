//! Outbound adapter for the external timeseries feed.

mod dto;
mod http_source;

pub use http_source::FeedHttpSource;
