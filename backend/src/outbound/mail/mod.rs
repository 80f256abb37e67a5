//! Outbound delivery channel adapters.
//!
//! Two implementations of the mail port: a reqwest adapter for a JSON mail
//! API, and a logging adapter for development environments where messages
//! should be observed but never delivered.

mod http_sender;
mod logging_sender;

pub use http_sender::HttpMailSender;
pub use logging_sender::LoggingMailSender;
