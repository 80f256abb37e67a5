//! Driving adapters invoking the domain.

pub mod http;
