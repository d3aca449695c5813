//! Calculation result models for the PIAWE engine.
//!
//! This module contains [`PiaweResult`], the outcome for one reference period,
//! and [`PiaweCalculation`], the complete auditable record returned to callers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Jurisdiction, PayslipEntry, PiaweAdjustment, Severity, ValidationIssue};

/// The computed outcome for one reference-period window.
///
/// `total_earnings` always equals the sum of the six categorised totals.
///
/// # Example
///
/// ```
/// use piawe_engine::models::PiaweResult;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let result = PiaweResult::empty(
///     52,
///     NaiveDate::from_ymd_opt(2023, 1, 16).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
/// );
/// assert_eq!(result.average_weekly, Decimal::ZERO);
/// assert_eq!(result.component_sum(), result.total_earnings);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiaweResult {
    /// Sum of every included category.
    pub total_earnings: Decimal,
    /// Ordinary hours multiplied by ordinary rates.
    pub ordinary_earnings: Decimal,
    /// Overtime counted under the jurisdiction's regularity rule.
    pub overtime_earnings: Decimal,
    /// Allowances counted under the jurisdiction's inclusion gate.
    pub allowances_total: Decimal,
    /// Bonuses counted under the jurisdiction's regularity rule.
    pub bonuses_total: Decimal,
    /// Commissions.
    pub commissions_total: Decimal,
    /// Piece rates and other income.
    pub other_income_total: Decimal,
    /// The nominal window length in weeks.
    pub total_weeks: u32,
    /// Weeks in the window with working data.
    pub included_weeks: u32,
    /// Unpaid leave weeks in the window.
    pub excluded_weeks: u32,
    /// Average weekly earnings over the included weeks.
    pub average_weekly: Decimal,
    /// Coefficient of variation of weekly included earnings.
    pub fluctuation: Decimal,
    /// First day of the window (inclusive).
    pub period_start: NaiveDate,
    /// Injury date; the window ends the day before.
    pub period_end: NaiveDate,
}

impl PiaweResult {
    /// A result with no included weeks.
    pub fn empty(total_weeks: u32, period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            total_earnings: Decimal::ZERO,
            ordinary_earnings: Decimal::ZERO,
            overtime_earnings: Decimal::ZERO,
            allowances_total: Decimal::ZERO,
            bonuses_total: Decimal::ZERO,
            commissions_total: Decimal::ZERO,
            other_income_total: Decimal::ZERO,
            total_weeks,
            included_weeks: 0,
            excluded_weeks: 0,
            average_weekly: Decimal::ZERO,
            fluctuation: Decimal::ZERO,
            period_start,
            period_end,
        }
    }

    /// Sum of the categorised totals.
    pub fn component_sum(&self) -> Decimal {
        self.ordinary_earnings
            + self.overtime_earnings
            + self.allowances_total
            + self.bonuses_total
            + self.commissions_total
            + self.other_income_total
    }
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete, auditable PIAWE calculation.
///
/// Built once per call and handed to the caller; every numeric field is
/// final and should be rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiaweCalculation {
    /// Unique identifier for this calculation.
    pub id: Uuid,
    /// The jurisdiction the calculation was made under.
    pub jurisdiction: Jurisdiction,
    /// The date of injury.
    pub injury_date: NaiveDate,
    /// The payslips supplied by the caller, echoed back for audit.
    pub payslips: Vec<PayslipEntry>,
    /// Outcome over the 52-week reference period.
    pub period_52_week: PiaweResult,
    /// Outcome over the 13-week reference period.
    pub period_13_week: PiaweResult,
    /// The figure after period selection, capping, and adjustments.
    pub final_piawe: Decimal,
    /// Which period or fallback produced the figure.
    pub method_used: String,
    /// Adjustments applied, in order.
    pub adjustments: Vec<PiaweAdjustment>,
    /// Data-quality findings.
    pub validation_issues: Vec<ValidationIssue>,
    /// Every decision made along the way.
    pub audit_trace: Vec<AuditStep>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// When the calculation was created.
    pub created_at: DateTime<Utc>,
    /// When the calculation was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PiaweCalculation {
    /// Returns true if any finding has error severity.
    pub fn has_errors(&self) -> bool {
        self.validation_issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueType;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_result() -> PiaweResult {
        PiaweResult {
            total_earnings: dec("5300.00"),
            ordinary_earnings: dec("5000.00"),
            overtime_earnings: dec("150.00"),
            allowances_total: dec("100.00"),
            bonuses_total: dec("0"),
            commissions_total: dec("50.00"),
            other_income_total: dec("0"),
            total_weeks: 13,
            included_weeks: 5,
            excluded_weeks: 1,
            average_weekly: dec("1060.00"),
            fluctuation: dec("0.05"),
            period_start: NaiveDate::from_ymd_opt(2023, 10, 16).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    fn create_sample_calculation(issues: Vec<ValidationIssue>) -> PiaweCalculation {
        let now = Utc::now();
        PiaweCalculation {
            id: Uuid::new_v4(),
            jurisdiction: Jurisdiction::Nsw,
            injury_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            payslips: vec![],
            period_52_week: create_sample_result(),
            period_13_week: create_sample_result(),
            final_piawe: dec("1060.00"),
            method_used: "52-week average (NSW standard)".to_string(),
            adjustments: vec![],
            validation_issues: issues,
            audit_trace: vec![],
            engine_version: "0.1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_component_sum_matches_total() {
        let result = create_sample_result();
        assert_eq!(result.component_sum(), result.total_earnings);
    }

    #[test]
    fn test_empty_result_has_zero_totals() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 16).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let result = PiaweResult::empty(52, start, end);
        assert_eq!(result.total_weeks, 52);
        assert_eq!(result.included_weeks, 0);
        assert_eq!(result.total_earnings, Decimal::ZERO);
        assert_eq!(result.period_start, start);
    }

    #[test]
    fn test_piawe_result_serialization() {
        let json = serde_json::to_string(&create_sample_result()).unwrap();
        assert!(json.contains("\"total_earnings\":\"5300.00\""));
        assert!(json.contains("\"average_weekly\":\"1060.00\""));
        assert!(json.contains("\"included_weeks\":5"));
        assert!(json.contains("\"period_start\":\"2023-10-16\""));
    }

    #[test]
    fn test_has_errors_only_for_error_severity() {
        let warning_only = create_sample_calculation(vec![ValidationIssue::warning(
            IssueType::InsufficientData,
            "short history",
        )]);
        assert!(!warning_only.has_errors());

        let with_error = create_sample_calculation(vec![ValidationIssue::error(
            IssueType::InconsistentRates,
            "gross exceeds components",
        )]);
        assert!(with_error.has_errors());
    }

    #[test]
    fn test_calculation_round_trips_through_json() {
        let calculation = create_sample_calculation(vec![]);
        let json = serde_json::to_string(&calculation).unwrap();
        assert!(json.contains("\"jurisdiction\":\"NSW\""));
        let back: PiaweCalculation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, calculation);
    }

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "rule_lookup".to_string(),
            rule_name: "Jurisdiction Rule Lookup".to_string(),
            input: serde_json::json!({"jurisdiction": "NSW"}),
            output: serde_json::json!({"minimum_weeks_required": 26}),
            reasoning: "Loaded NSW rules".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"rule_lookup\""));
    }
}
