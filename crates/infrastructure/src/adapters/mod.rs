//! Port adapters

pub mod relay_client;
