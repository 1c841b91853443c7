//! Application state
//!
//! One explicit state value owning collections, environments, history,
//! cookies, responses, and the console sink. Callers own the value and
//! thread it through update operations; there is no hidden global.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::console::{LogKind, LogSink};
use crate::cookie::CookieJar;
use crate::environment::{EnvVariable, Environment};
use crate::error::{DomainError, DomainResult};
use crate::history::History;
use crate::request::{KeyValueRow, RequestTemplate};
use crate::response::Response;

/// The persisted-state export/import document.
///
/// All fields are optional on load: absent fields leave the
/// corresponding in-memory list untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedConfig {
    /// Stored collections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<Collection>>,
    /// Stored environments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environments: Option<Vec<Environment>>,
    /// Request history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<History>,
    /// Cookie jar contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<CookieJar>,
}

/// In-memory application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    /// All collections
    pub collections: Vec<Collection>,
    /// All environments
    pub environments: Vec<Environment>,
    /// Id of the active environment, if any
    pub active_environment_id: Option<String>,
    /// Bounded request history
    pub history: History,
    /// Simulated cookie jar
    pub cookies: CookieJar,
    /// Last response per request id, overwritten on each send
    pub responses: HashMap<String, Response>,
    /// Console log ring
    pub logs: LogSink,
}

impl Workspace {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the first-run workspace: one collection with a sample
    /// request and an active `Production` environment.
    #[must_use]
    pub fn seeded() -> Self {
        let mut request = RequestTemplate::new("New Request", "{{baseUrl}}/users/octocat");
        request
            .headers
            .add(KeyValueRow::new("Content-Type", "application/json"));
        request.params.add(KeyValueRow::blank());

        let mut collection = Collection::new("My APIs");
        collection.add_request(request);

        let mut environment = Environment::new("Production");
        environment.push_variable(EnvVariable::new("baseUrl", "https://api.github.com"));
        let env_id = environment.id.clone();

        Self {
            collections: vec![collection],
            environments: vec![environment],
            active_environment_id: Some(env_id),
            ..Self::default()
        }
    }

    /// Returns the active environment, if one is selected.
    #[must_use]
    pub fn active_environment(&self) -> Option<&Environment> {
        let id = self.active_environment_id.as_deref()?;
        self.environments.iter().find(|e| e.id == id)
    }

    /// Selects an environment (or none).
    pub fn set_active_environment(&mut self, id: Option<String>) {
        self.active_environment_id = id;
    }

    /// Finds a request by id, searching collections first and then
    /// history.
    #[must_use]
    pub fn find_request(&self, id: &str) -> Option<&RequestTemplate> {
        self.collections
            .iter()
            .find_map(|c| c.find_request(id))
            .or_else(|| self.history.get(id))
    }

    /// Replaces a request in place wherever its id appears, both in
    /// collections and in history.
    pub fn update_request(&mut self, request: &RequestTemplate) {
        for collection in &mut self.collections {
            for stored in &mut collection.requests {
                if stored.id == request.id {
                    *stored = request.clone();
                }
            }
        }
        self.history.update(request);
    }

    /// Removes a request everywhere: collections, history, and the
    /// response map.
    pub fn remove_request(&mut self, id: &str) {
        for collection in &mut self.collections {
            collection.remove_request(id);
        }
        self.history.remove(id);
        self.responses.remove(id);
    }

    /// Adds a collection.
    pub fn add_collection(&mut self, collection: Collection) {
        self.collections.push(collection);
    }

    /// Removes a collection by id.
    pub fn remove_collection(&mut self, id: &str) {
        self.collections.retain(|c| c.id != id);
    }

    /// Renames a collection.
    pub fn rename_collection(&mut self, id: &str, name: impl Into<String>) {
        if let Some(collection) = self.collections.iter_mut().find(|c| c.id == id) {
            collection.name = name.into();
        }
    }

    /// Stores the latest response for a request, overwriting any
    /// previous one.
    pub fn store_response(&mut self, request_id: impl Into<String>, response: Response) {
        self.responses.insert(request_id.into(), response);
    }

    /// Returns the last response for a request, if any.
    #[must_use]
    pub fn response_for(&self, request_id: &str) -> Option<&Response> {
        self.responses.get(request_id)
    }

    /// Appends a console log entry.
    pub fn log(&mut self, kind: LogKind, message: impl Into<String>, details: Option<Value>) {
        self.logs.append(kind, message, details);
    }

    /// Serializes collections, environments, history, and cookies as a
    /// pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidConfiguration`] if serialization
    /// fails, which would indicate a bug in the domain types.
    pub fn export_config(&self) -> DomainResult<String> {
        let config = PersistedConfig {
            collections: Some(self.collections.clone()),
            environments: Some(self.environments.clone()),
            history: Some(self.history.clone()),
            cookies: Some(self.cookies.clone()),
        };
        serde_json::to_string_pretty(&config)
            .map_err(|e| DomainError::InvalidConfiguration(e.to_string()))
    }

    /// Loads a configuration document exported by [`Self::export_config`].
    ///
    /// The whole document is parsed before anything is applied: on a
    /// malformed document the prior state is left untouched, with no
    /// partial merge. Absent top-level fields keep their in-memory
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidConfiguration`] when the document
    /// is not valid JSON for the persisted shape.
    pub fn import_config(&mut self, document: &str) -> DomainResult<()> {
        let config: PersistedConfig = serde_json::from_str(document)
            .map_err(|e| DomainError::InvalidConfiguration(e.to_string()))?;

        if let Some(collections) = config.collections {
            self.collections = collections;
        }
        if let Some(environments) = config.environments {
            self.environments = environments;
        }
        if let Some(history) = config.history {
            self.history = history;
        }
        if let Some(cookies) = config.cookies {
            self.cookies = cookies;
        }

        self.log(LogKind::Info, "Configuration loaded successfully", None);
        Ok(())
    }
}
