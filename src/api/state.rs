//! Application state for the PIAWE engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::RuleTable;

/// Shared application state.
///
/// Holds the jurisdiction rule table every request is calculated against.
#[derive(Clone)]
pub struct AppState {
    rules: Arc<RuleTable>,
}

impl AppState {
    /// Creates application state around a rule table.
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    /// Creates application state using the built-in rule table.
    pub fn builtin() -> Self {
        Self::new(RuleTable::builtin().clone())
    }

    /// Returns the rule table.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}
