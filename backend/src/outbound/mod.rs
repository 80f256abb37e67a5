//! Driven adapters implementing the domain ports.

pub mod feed;
pub mod mail;
pub mod persistence;
pub mod templates;
