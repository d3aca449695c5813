//! Jurisdiction rule types.
//!
//! This module contains the strongly-typed rule structures that make up a
//! [`RuleTable`](super::RuleTable), either built in or deserialized from YAML.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Jurisdiction;

/// Which bonus categories a jurisdiction counts as earnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusInclusions {
    /// Regular, recurring bonuses.
    pub regular: bool,
    /// Performance bonuses.
    pub performance: bool,
    /// Annual bonuses.
    pub annual: bool,
}

/// Statutory ceilings on the weekly figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CappingRules {
    /// Maximum weekly amount.
    #[serde(default)]
    pub max_weekly_amount: Option<Decimal>,
    /// Maximum annual amount; imposes a weekly ceiling of one fifty-second.
    #[serde(default)]
    pub max_annual_amount: Option<Decimal>,
}

impl CappingRules {
    /// The effective weekly ceiling, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use piawe_engine::config::CappingRules;
    /// use rust_decimal::Decimal;
    ///
    /// let caps = CappingRules {
    ///     max_weekly_amount: Some(Decimal::from(2400)),
    ///     max_annual_amount: Some(Decimal::from(104000)),
    /// };
    /// assert_eq!(caps.weekly_ceiling(), Some(Decimal::from(2000)));
    /// ```
    pub fn weekly_ceiling(&self) -> Option<Decimal> {
        let annual_weekly = self.max_annual_amount.map(|annual| annual / Decimal::from(52));
        match (self.max_weekly_amount, annual_weekly) {
            (Some(weekly), Some(annual)) => Some(weekly.min(annual)),
            (weekly, annual) => weekly.or(annual),
        }
    }
}

/// The calculation rules for one jurisdiction.
///
/// Rule sets are read-only once a table is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JurisdictionRules {
    /// The jurisdiction these rules apply to.
    pub jurisdiction: Jurisdiction,
    /// Display name of the scheme's jurisdiction.
    pub name: String,
    /// Primary reference period in weeks.
    pub default_reference_period: u32,
    /// Fallback reference periods, in order of preference.
    #[serde(default)]
    pub alternative_reference_periods: Vec<u32>,
    /// Weeks of data required for the primary method.
    pub minimum_weeks_required: u32,
    /// Allowance categories that count as earnings; empty excludes all allowances.
    #[serde(default)]
    pub allowance_inclusions: Vec<String>,
    /// Bonus categories that count as earnings.
    pub bonus_inclusions: BonusInclusions,
    /// Optional statutory ceilings.
    #[serde(default)]
    pub capping_rules: Option<CappingRules>,
}

impl JurisdictionRules {
    /// Returns true if allowances count toward earnings.
    pub fn includes_allowances(&self) -> bool {
        !self.allowance_inclusions.is_empty()
    }

    /// The effective weekly ceiling, if the jurisdiction caps PIAWE.
    pub fn weekly_cap(&self) -> Option<Decimal> {
        self.capping_rules.as_ref().and_then(CappingRules::weekly_ceiling)
    }
}

/// Rule table file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleTableConfig {
    /// One rule set per jurisdiction.
    pub jurisdictions: Vec<JurisdictionRules>,
}
