//! Manual adjustments applied after the PIAWE figure is resolved.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of manual adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustmentType {
    /// A base rate increase the worker would have received.
    BaseRateIncrease,
    /// A variation under an industrial agreement.
    IndustrialAgreement,
    /// Replaces the running figure outright.
    ManualOverride,
    /// A correction required by a jurisdiction-specific rule.
    JurisdictionRule,
}

impl AdjustmentType {
    /// Returns true if this adjustment replaces rather than adds.
    pub fn replaces_value(self) -> bool {
        self == AdjustmentType::ManualOverride
    }
}

/// A manual correction to the computed PIAWE.
///
/// Adjustments are applied in list order. A
/// [`ManualOverride`](AdjustmentType::ManualOverride) discards everything
/// accumulated before it; every other type adds its (signed) amount.
///
/// # Example
///
/// ```
/// use piawe_engine::models::{AdjustmentType, PiaweAdjustment};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let adjustment = PiaweAdjustment {
///     adjustment_type: AdjustmentType::BaseRateIncrease,
///     amount: Decimal::from(35),
///     description: "Annual wage review".to_string(),
///     reason: "Increase effective 1 July".to_string(),
///     applied_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
/// };
///
/// assert_eq!(adjustment.apply(Decimal::from(1000)), Decimal::from(1035));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiaweAdjustment {
    /// The kind of adjustment.
    #[serde(rename = "type")]
    pub adjustment_type: AdjustmentType,
    /// The signed amount to add, or the replacement value for an override.
    pub amount: Decimal,
    /// Short description of the adjustment.
    pub description: String,
    /// Free-text justification recorded for audit.
    #[serde(default)]
    pub reason: String,
    /// The date the adjustment was applied.
    pub applied_date: NaiveDate,
}

impl PiaweAdjustment {
    /// Applies this adjustment to a running value.
    pub fn apply(&self, running: Decimal) -> Decimal {
        if self.adjustment_type.replaces_value() {
            self.amount
        } else {
            running + self.amount
        }
    }
}
