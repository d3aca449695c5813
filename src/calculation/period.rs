//! Reference-period calculation.
//!
//! This module computes a [`PiaweResult`] for one reference-period window
//! ending at the injury date.

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use crate::config::JurisdictionRules;
use crate::models::{AuditStep, Jurisdiction, PayslipEntry, PiaweResult};

use super::earnings::aggregate;

/// The standard reference period in weeks.
pub const STANDARD_PERIOD_WEEKS: u32 = 52;

/// The short fallback reference period in weeks.
pub const SHORT_PERIOD_WEEKS: u32 = 13;

/// The result of a period calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct PeriodCalculationResult {
    /// The computed period outcome.
    pub result: PiaweResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the first day of a window of `period_weeks` ending at the injury date.
pub fn window_start(injury_date: NaiveDate, period_weeks: u32) -> NaiveDate {
    injury_date
        .checked_sub_days(Days::new(7 * u64::from(period_weeks)))
        .unwrap_or(NaiveDate::MIN)
}

/// Returns true if a week ending falls in `[start, injury_date)`.
pub fn in_window(week_ending: NaiveDate, start: NaiveDate, injury_date: NaiveDate) -> bool {
    week_ending >= start && week_ending < injury_date
}

/// Population coefficient of variation (standard deviation over mean),
/// rounded to four decimal places.
///
/// Returns zero for fewer than two values, a non-positive mean, or values
/// too far apart to measure. Deviations are taken relative to the mean, so
/// amounts near the top of the Decimal range do not overflow.
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::coefficient_of_variation;
/// use rust_decimal::Decimal;
///
/// let values = [Decimal::from(900), Decimal::from(1100)];
/// assert_eq!(coefficient_of_variation(&values), Decimal::new(1, 1));
/// ```
pub fn coefficient_of_variation(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    relative_std_dev(values)
        .map(|cv| cv.round_dp(4))
        .unwrap_or(Decimal::ZERO)
}

fn relative_std_dev(values: &[Decimal]) -> Option<Decimal> {
    let count = Decimal::from(values.len());
    let mean = match values
        .iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value))
    {
        Some(sum) => sum / count,
        None => values
            .iter()
            .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value / count))?,
    };
    if mean <= Decimal::ZERO {
        return None;
    }

    let mut squares = Decimal::ZERO;
    for value in values {
        let ratio = value.checked_sub(mean)?.checked_div(mean)?;
        squares = squares.checked_add(ratio.checked_mul(ratio)?)?;
    }
    (squares / count).sqrt()
}

/// Computes the outcome for a reference-period window.
///
/// The window is `[injury_date - period_weeks, injury_date)`: a payslip ending
/// exactly on the start boundary is kept, one ending on the injury date is
/// not. Unpaid leave weeks count toward `excluded_weeks` and are otherwise
/// ignored. NSW averages ordinary earnings only; every other jurisdiction
/// averages total earnings. With no included weeks the average is zero.
///
/// `payslips` must be ordered most recent first.
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::calculate_for_period;
/// use piawe_engine::config::RuleTable;
/// use piawe_engine::models::Jurisdiction;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let injury = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let rules = RuleTable::builtin().get_rules(Jurisdiction::Qld);
/// let outcome = calculate_for_period(&[], injury, 13, rules, Jurisdiction::Qld, 1);
///
/// assert_eq!(outcome.result.included_weeks, 0);
/// assert_eq!(outcome.result.average_weekly, Decimal::ZERO);
/// ```
pub fn calculate_for_period(
    payslips: &[PayslipEntry],
    injury_date: NaiveDate,
    period_weeks: u32,
    rules: &JurisdictionRules,
    jurisdiction: Jurisdiction,
    step_number: u32,
) -> PeriodCalculationResult {
    let start = window_start(injury_date, period_weeks);

    let (unpaid, working): (Vec<PayslipEntry>, Vec<PayslipEntry>) = payslips
        .iter()
        .filter(|p| in_window(p.week_ending, start, injury_date))
        .cloned()
        .partition(|p| p.unpaid_leave);

    let totals = aggregate(&working, jurisdiction, rules);
    let included_weeks = working.len() as u32;
    let excluded_weeks = unpaid.len() as u32;

    let averaged = if jurisdiction == Jurisdiction::Nsw {
        totals.ordinary
    } else {
        totals.total
    };
    let average_weekly = if included_weeks == 0 {
        Decimal::ZERO
    } else {
        averaged / Decimal::from(included_weeks)
    };

    let fluctuation = coefficient_of_variation(&totals.weekly_totals);

    let result = PiaweResult {
        total_earnings: totals.total,
        ordinary_earnings: totals.ordinary,
        overtime_earnings: totals.overtime,
        allowances_total: totals.allowances,
        bonuses_total: totals.bonuses,
        commissions_total: totals.commissions,
        other_income_total: totals.other_income,
        total_weeks: period_weeks,
        included_weeks,
        excluded_weeks,
        average_weekly,
        fluctuation,
        period_start: start,
        period_end: injury_date,
    };

    debug!(
        jurisdiction = %jurisdiction,
        period_weeks,
        included_weeks,
        excluded_weeks,
        average_weekly = %average_weekly,
        "Computed reference period"
    );

    let basis = if jurisdiction == Jurisdiction::Nsw {
        "Ordinary earnings"
    } else {
        "Total earnings"
    };
    let reasoning = if included_weeks == 0 {
        format!(
            "No working weeks between {} and {}; average is $0",
            start, injury_date
        )
    } else {
        format!(
            "{} {} over {} working weeks = ${} per week ({} unpaid leave weeks excluded)",
            basis,
            averaged.normalize(),
            included_weeks,
            average_weekly.normalize(),
            excluded_weeks
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("period_{}_week", period_weeks),
        rule_name: format!("{}-Week Reference Period", period_weeks),
        input: serde_json::json!({
            "period_start": start.to_string(),
            "period_end": injury_date.to_string(),
            "payslips_in_window": included_weeks + excluded_weeks,
        }),
        output: serde_json::json!({
            "included_weeks": included_weeks,
            "excluded_weeks": excluded_weeks,
            "overtime_included": totals.overtime_included,
            "allowances_included": totals.allowances_included,
            "bonuses_included": totals.bonuses_included,
            "total_earnings": totals.total.normalize().to_string(),
            "average_weekly": average_weekly.normalize().to_string(),
            "fluctuation": fluctuation.normalize().to_string(),
        }),
        reasoning,
    };

    PeriodCalculationResult { result, audit_step }
}
