//! Ports to the outside world

mod relay_client;

pub use relay_client::{RelayClient, RelayError, RelayRequest, RelayResponse};
