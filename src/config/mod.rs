//! Jurisdiction rules for the PIAWE engine.
//!
//! This module provides the read-only [`RuleTable`] of per-jurisdiction
//! parameters and a [`ConfigLoader`] for YAML rule tables.
//!
//! # Example
//!
//! ```
//! use piawe_engine::config::RuleTable;
//! use piawe_engine::models::Jurisdiction;
//!
//! let rules = RuleTable::builtin().get_rules(Jurisdiction::Nsw);
//! assert_eq!(rules.default_reference_period, 52);
//! ```

mod loader;
mod rule_table;
mod types;

pub use loader::ConfigLoader;
pub use rule_table::{RuleTable, fixed_reference_weeks};
pub use types::{BonusInclusions, CappingRules, JurisdictionRules, RuleTableConfig};
