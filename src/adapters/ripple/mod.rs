//! Ripple registry integration

pub mod client;
pub mod models;

pub use client::RippleClient;
