//! Request collections

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::request::RequestTemplate;

/// A named group of request templates.
///
/// Every stored request belongs to exactly one collection; history
/// entries are separate copies keyed by the same request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Requests in display/run order
    #[serde(default)]
    pub requests: Vec<RequestTemplate>,
}

impl Collection {
    /// Creates a new empty collection with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            requests: Vec::new(),
        }
    }

    /// Adds a request to the collection.
    pub fn add_request(&mut self, request: RequestTemplate) {
        self.requests.push(request);
    }

    /// Finds a request by id.
    #[must_use]
    pub fn find_request(&self, id: &str) -> Option<&RequestTemplate> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Removes a request by id, returning true if one was removed.
    pub fn remove_request(&mut self, id: &str) -> bool {
        let before = self.requests.len();
        self.requests.retain(|r| r.id != id);
        self.requests.len() != before
    }

    /// Returns the number of requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true if the collection has no requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
