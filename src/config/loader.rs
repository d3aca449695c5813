//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading jurisdiction
//! rule tables from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Jurisdiction;

use super::rule_table::RuleTable;
use super::types::{JurisdictionRules, RuleTableConfig};

/// Loads and provides access to a jurisdiction rule table.
///
/// Caps are indexed periodically, so a deployment can pin the figures for a
/// financial year in a YAML file instead of relying on the built-in table.
///
/// Only caps, allowance and bonus inclusions, and the TAS, NT, and ACT
/// minimum weeks are tunable. The NSW, VIC, QLD, WA, and SA minimum weeks and
/// every jurisdiction's `alternative_reference_periods` are fixed by the
/// decision table; a file that changes them is rejected with
/// [`EngineError::InvalidRuleTable`].
///
/// # File Structure
///
/// ```text
/// jurisdictions:
///   - jurisdiction: NSW
///     name: New South Wales
///     default_reference_period: 52
///     alternative_reference_periods: [13]
///     minimum_weeks_required: 26
///     allowance_inclusions: [shift, site]
///     bonus_inclusions: { regular: true, performance: false, annual: false }
///     capping_rules: { max_weekly_amount: "2500.00" }
///   # ... one entry for each of the eight jurisdictions
/// ```
///
/// # Example
///
/// ```no_run
/// use piawe_engine::config::ConfigLoader;
/// use piawe_engine::models::Jurisdiction;
///
/// let loader = ConfigLoader::load("./config/jurisdictions.yaml").unwrap();
/// let rules = loader.get_rules(Jurisdiction::Nsw);
/// println!("NSW needs {} weeks", rules.minimum_weeks_required);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    table: RuleTable,
}

impl ConfigLoader {
    /// Loads a rule table from the specified YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is missing ([`EngineError::ConfigNotFound`])
    /// - The file contains invalid YAML or unknown fields ([`EngineError::ConfigParseError`])
    /// - The table breaks a table invariant ([`EngineError::InvalidRuleTable`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses a rule table from YAML text.
    ///
    /// `source` names the origin of the text in error messages.
    pub fn parse(content: &str, source: &str) -> EngineResult<Self> {
        let config: RuleTableConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;

        let table = RuleTable::new(config.jurisdictions)?;
        Ok(Self { table })
    }

    /// Returns the loaded rule table.
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Consumes the loader, returning the rule table.
    pub fn into_table(self) -> RuleTable {
        self.table
    }

    /// Gets the rules for a jurisdiction.
    pub fn get_rules(&self, jurisdiction: Jurisdiction) -> &JurisdictionRules {
        self.table.get_rules(jurisdiction)
    }
}
