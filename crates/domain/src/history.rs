//! Request history
//!
//! A bounded, most-recent-first list of sent requests, deduplicated by
//! request id.

use std::collections::VecDeque;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::request::RequestTemplate;

/// Maximum number of history entries retained.
pub const MAX_ENTRIES: usize = 50;

/// Bounded request history (newest first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: VecDeque<RequestTemplate>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Records a send of the given request.
    ///
    /// If an entry with the same id is already present it is moved to
    /// the front (dedupe-and-promote) carrying the request's current
    /// state; otherwise the request is prepended with a fresh
    /// timestamp. The cap is enforced on every insert.
    pub fn record(&mut self, mut request: RequestTemplate) {
        let already_present = self.entries.iter().any(|e| e.id == request.id);
        self.entries.retain(|e| e.id != request.id);

        if !already_present {
            request.timestamp = Some(Utc::now());
        }
        self.entries.push_front(request);

        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_back();
        }
    }

    /// Returns all entries (newest first).
    #[must_use]
    pub fn entries(&self) -> &VecDeque<RequestTemplate> {
        &self.entries
    }

    /// Returns an entry by request id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RequestTemplate> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Removes an entry by request id.
    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|e| e.id != id);
    }

    /// Replaces an entry in place when the id matches.
    pub fn update(&mut self, request: &RequestTemplate) {
        for entry in &mut self.entries {
            if entry.id == request.id {
                *entry = request.clone();
            }
        }
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
