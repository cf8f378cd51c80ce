//! REDCap destination integration

pub mod client;
pub mod models;

pub use client::RedcapClient;
pub use models::{ImportMode, PushOutcome};
