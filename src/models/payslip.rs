//! Payslip model.
//!
//! This module defines [`PayslipEntry`], one week of a worker's pay history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One week of pay history.
///
/// The categorised amounts are pre-aggregated by whoever captured the
/// payslip. `total_gross` is expected to equal the sum of the components;
/// a gross figure well above that sum usually means superannuation was
/// folded in.
///
/// # Example
///
/// ```
/// use piawe_engine::models::PayslipEntry;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let payslip = PayslipEntry {
///     id: "ps_001".to_string(),
///     week_ending: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
///     ordinary_hours: Decimal::from(38),
///     ordinary_rate: Decimal::from_str("28.50").unwrap(),
///     overtime_hours: Decimal::ZERO,
///     overtime_rate: Decimal::ZERO,
///     allowances: Decimal::ZERO,
///     bonuses: Decimal::ZERO,
///     commissions: Decimal::ZERO,
///     other_income: Decimal::ZERO,
///     total_gross: Decimal::from_str("1083.00").unwrap(),
///     unpaid_leave: false,
/// };
///
/// assert_eq!(payslip.ordinary_earnings(), Decimal::from_str("1083.00").unwrap());
/// assert_eq!(payslip.component_total(), payslip.total_gross);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipEntry {
    /// Unique identifier for the payslip.
    pub id: String,
    /// The last day of the pay week.
    pub week_ending: NaiveDate,
    /// Ordinary hours worked.
    pub ordinary_hours: Decimal,
    /// Ordinary hourly rate.
    pub ordinary_rate: Decimal,
    /// Overtime hours worked.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Overtime hourly rate.
    #[serde(default)]
    pub overtime_rate: Decimal,
    /// Allowances paid in the week.
    #[serde(default)]
    pub allowances: Decimal,
    /// Bonuses paid in the week.
    #[serde(default)]
    pub bonuses: Decimal,
    /// Commissions paid in the week.
    #[serde(default)]
    pub commissions: Decimal,
    /// Piece rates and any other income.
    #[serde(default)]
    pub other_income: Decimal,
    /// Gross pay as printed on the payslip.
    pub total_gross: Decimal,
    /// Whether the week was unpaid leave.
    #[serde(default)]
    pub unpaid_leave: bool,
}

impl PayslipEntry {
    /// Ordinary hours multiplied by the ordinary rate.
    pub fn ordinary_earnings(&self) -> Decimal {
        self.ordinary_hours * self.ordinary_rate
    }

    /// Overtime hours multiplied by the overtime rate.
    pub fn overtime_earnings(&self) -> Decimal {
        self.overtime_hours * self.overtime_rate
    }

    /// Sum of every declared component, regardless of jurisdiction rules.
    pub fn component_total(&self) -> Decimal {
        self.ordinary_earnings()
            + self.overtime_earnings()
            + self.allowances
            + self.bonuses
            + self.commissions
            + self.other_income
    }

    /// [`component_total`](Self::component_total), or `None` if any product
    /// or sum leaves the Decimal range.
    pub fn checked_component_total(&self) -> Option<Decimal> {
        self.ordinary_hours
            .checked_mul(self.ordinary_rate)?
            .checked_add(self.overtime_hours.checked_mul(self.overtime_rate)?)?
            .checked_add(self.allowances)?
            .checked_add(self.bonuses)?
            .checked_add(self.commissions)?
            .checked_add(self.other_income)
    }

    /// Rejects negative hours, rates, and amounts, and components whose
    /// total cannot be represented.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPayslip`] naming the first negative field,
    /// or `component_total` when the components overflow.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("ordinary_hours", self.ordinary_hours),
            ("ordinary_rate", self.ordinary_rate),
            ("overtime_hours", self.overtime_hours),
            ("overtime_rate", self.overtime_rate),
            ("allowances", self.allowances),
            ("bonuses", self.bonuses),
            ("commissions", self.commissions),
            ("other_income", self.other_income),
            ("total_gross", self.total_gross),
        ];

        if let Some((field, value)) = fields.iter().find(|(_, value)| *value < Decimal::ZERO) {
            return Err(EngineError::InvalidPayslip {
                payslip_id: self.id.clone(),
                field: field.to_string(),
                message: format!("must not be negative (got {})", value),
            });
        }

        match self.checked_component_total() {
            Some(_) => Ok(()),
            None => Err(EngineError::InvalidPayslip {
                payslip_id: self.id.clone(),
                field: "component_total".to_string(),
                message: "components exceed the supported numeric range".to_string(),
            }),
        }
    }
}
