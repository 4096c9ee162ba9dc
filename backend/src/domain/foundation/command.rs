//! Command infrastructure for application handlers.
//!
//! `CommandMetadata` is the context that flows through command processing:
//! who is acting (the resolved [`Principal`]) and how to correlate the log
//! lines a single request produces.

use uuid::Uuid;

use super::Principal;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMetadata {
    /// The principal executing this command (required for authorization).
    pub principal: Principal,

    /// Links related operations across a single user request.
    correlation_id: String,

    /// Source of this command (e.g., "api", "websocket").
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for the acting principal, with a fresh
    /// correlation ID.
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            correlation_id: Uuid::new_v4().to_string(),
            source: None,
        }
    }

    /// Builder: Use the caller's request ID for correlation.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
