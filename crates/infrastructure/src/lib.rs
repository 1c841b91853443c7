//! ReqAtlas Infrastructure
//!
//! Concrete adapters for the application-layer ports.

pub mod adapters;

pub use adapters::relay_client::HttpRelayClient;
