//! ReqAtlas Application Layer
//!
//! The request pipeline: variable resolution, auth and cookie header
//! building, single-request dispatch, and sequential collection runs.
//! Network access goes through the [`ports::RelayClient`] port; the
//! concrete relay transport lives in the infrastructure crate.

pub mod dispatcher;
pub mod headers;
pub mod ports;
pub mod resolver;
pub mod runner;

pub use dispatcher::Dispatcher;
pub use headers::{authorization_header, cookie_header, url_hostname};
pub use ports::{RelayClient, RelayError, RelayRequest, RelayResponse};
pub use resolver::resolve;
pub use runner::{CollectionRunner, RunReport};
