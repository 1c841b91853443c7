//! ReqAtlas Domain - Core business types
//!
//! This crate defines the domain model for the ReqAtlas API client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod collection;
pub mod console;
pub mod cookie;
pub mod environment;
pub mod error;
pub mod history;
pub mod id;
pub mod request;
pub mod response;
pub mod workspace;

pub use auth::AuthConfig;
pub use collection::Collection;
pub use console::{ConsoleLog, LogKind, LogSink};
pub use cookie::{Cookie, CookieJar};
pub use environment::{EnvVariable, Environment};
pub use error::{DomainError, DomainResult};
pub use history::History;
pub use id::generate_id;
pub use request::{BodyType, HttpMethod, KeyValueRow, RequestTemplate, RequestType, RowList};
pub use response::{Response, ResponseBody, RunResult, RunSummary};
pub use workspace::{PersistedConfig, Workspace};
