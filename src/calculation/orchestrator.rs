//! The public PIAWE entry point.
//!
//! The orchestrator sequences rule lookup, period calculation, resolution,
//! and validation into a single [`PiaweCalculation`]. It has no branching
//! logic of its own.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RuleTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Jurisdiction, PayslipEntry, PiaweAdjustment, PiaweCalculation};

use super::period::{calculate_for_period, SHORT_PERIOD_WEEKS, STANDARD_PERIOD_WEEKS};
use super::resolver::resolve;
use super::validator::validate;

/// Parses an ISO-8601 injury date.
///
/// Accepts a calendar date (`2024-01-15`), a local date-time without an
/// offset (`2024-01-15T09:30:00`), or an RFC 3339 timestamp, in which case
/// the date part in the timestamp's own offset is used.
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::parse_injury_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(parse_injury_date("2024-01-15").unwrap(), expected);
/// assert_eq!(parse_injury_date("2024-01-15T09:30:00").unwrap(), expected);
/// assert_eq!(parse_injury_date("2024-01-15T09:30:00+10:00").unwrap(), expected);
/// assert!(parse_injury_date("15/01/2024").is_err());
/// ```
pub fn parse_injury_date(value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(local.date());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|e| EngineError::InvalidInjuryDate {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Calculates PIAWE against the built-in rule table.
///
/// # Errors
///
/// Returns an error if:
/// - The injury date is not ISO-8601 ([`EngineError::InvalidInjuryDate`])
/// - The jurisdiction code is unknown ([`EngineError::UnknownJurisdiction`])
/// - A payslip has a negative numeric field ([`EngineError::InvalidPayslip`])
/// - The payslips and adjustments together exceed the Decimal range
///   ([`EngineError::AmountOutOfRange`])
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::calculate_piawe;
/// use rust_decimal::Decimal;
///
/// let calculation = calculate_piawe(&[], "2024-01-15", "NSW", &[]).unwrap();
/// assert_eq!(calculation.final_piawe, Decimal::ZERO);
/// assert!(calculation.method_used.contains("insufficient data"));
/// ```
pub fn calculate_piawe(
    payslips: &[PayslipEntry],
    injury_date: &str,
    jurisdiction: &str,
    adjustments: &[PiaweAdjustment],
) -> EngineResult<PiaweCalculation> {
    calculate_piawe_with_rules(
        RuleTable::builtin(),
        payslips,
        injury_date,
        jurisdiction,
        adjustments,
    )
}

/// Calculates PIAWE against a specific rule table.
pub fn calculate_piawe_with_rules(
    table: &RuleTable,
    payslips: &[PayslipEntry],
    injury_date: &str,
    jurisdiction: &str,
    adjustments: &[PiaweAdjustment],
) -> EngineResult<PiaweCalculation> {
    let injury_date = parse_injury_date(injury_date).inspect_err(|err| {
        warn!(error = %err, "Rejected calculation");
    })?;
    let jurisdiction: Jurisdiction = jurisdiction.parse().inspect_err(|err| {
        warn!(error = %err, "Rejected calculation");
    })?;
    calculate(table, payslips, injury_date, jurisdiction, adjustments)
}

/// Calculates PIAWE from already-parsed inputs.
///
/// The input payslips are never modified; the record echoes them back in
/// the order supplied.
pub fn calculate(
    table: &RuleTable,
    payslips: &[PayslipEntry],
    injury_date: NaiveDate,
    jurisdiction: Jurisdiction,
    adjustments: &[PiaweAdjustment],
) -> EngineResult<PiaweCalculation> {
    for payslip in payslips {
        payslip.validate().inspect_err(|err| {
            warn!(jurisdiction = %jurisdiction, error = %err, "Rejected calculation");
        })?;
    }
    check_amount_range(payslips, adjustments).inspect_err(|err| {
        warn!(jurisdiction = %jurisdiction, error = %err, "Rejected calculation");
    })?;

    let rules = table.get_rules(jurisdiction);
    let mut audit_trace: Vec<AuditStep> = Vec::new();
    let mut step_number = 1;

    audit_trace.push(AuditStep {
        step_number,
        rule_id: "rule_lookup".to_string(),
        rule_name: "Jurisdiction Rule Lookup".to_string(),
        input: serde_json::json!({
            "jurisdiction": jurisdiction.code(),
            "injury_date": injury_date.to_string(),
            "payslip_count": payslips.len(),
        }),
        output: serde_json::json!({
            "name": rules.name,
            "minimum_weeks_required": rules.minimum_weeks_required,
            "alternative_reference_periods": rules.alternative_reference_periods,
            "includes_allowances": rules.includes_allowances(),
            "weekly_cap": rules.weekly_cap().map(|c| c.normalize().to_string()),
        }),
        reasoning: format!("Loaded {} ({}) rules", rules.name, jurisdiction),
    });
    step_number += 1;

    let mut sorted = payslips.to_vec();
    sorted.sort_by(|a, b| {
        b.week_ending
            .cmp(&a.week_ending)
            .then_with(|| a.id.cmp(&b.id))
    });

    let period_52 = calculate_for_period(
        &sorted,
        injury_date,
        STANDARD_PERIOD_WEEKS,
        rules,
        jurisdiction,
        step_number,
    );
    audit_trace.push(period_52.audit_step);
    step_number += 1;

    let period_13 = calculate_for_period(
        &sorted,
        injury_date,
        SHORT_PERIOD_WEEKS,
        rules,
        jurisdiction,
        step_number,
    );
    audit_trace.push(period_13.audit_step);
    step_number += 1;

    let resolution = resolve(
        &period_52.result,
        &period_13.result,
        rules,
        jurisdiction,
        adjustments,
        step_number,
    );
    audit_trace.extend(resolution.audit_steps);

    let validation_issues = validate(&sorted, injury_date, rules, jurisdiction);

    let now = Utc::now();
    let calculation = PiaweCalculation {
        id: Uuid::new_v4(),
        jurisdiction,
        injury_date,
        payslips: payslips.to_vec(),
        period_52_week: period_52.result,
        period_13_week: period_13.result,
        final_piawe: resolution.final_piawe,
        method_used: resolution.method_used,
        adjustments: adjustments.to_vec(),
        validation_issues,
        audit_trace,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        created_at: now,
        updated_at: now,
    };

    if calculation.has_errors() {
        warn!(
            calculation_id = %calculation.id,
            jurisdiction = %jurisdiction,
            "Calculation has error-severity findings"
        );
    }
    info!(
        calculation_id = %calculation.id,
        jurisdiction = %jurisdiction,
        payslips = payslips.len(),
        final_piawe = %calculation.final_piawe,
        method_used = %calculation.method_used,
        issues = calculation.validation_issues.len(),
        "PIAWE calculation completed"
    );

    Ok(calculation)
}

/// Every total the engine forms is bounded by the sum of all payslip
/// components and gross figures plus the magnitude of every adjustment.
fn check_amount_range(
    payslips: &[PayslipEntry],
    adjustments: &[PiaweAdjustment],
) -> EngineResult<()> {
    let earnings = payslips.iter().try_fold(Decimal::ZERO, |sum, payslip| {
        sum.checked_add(payslip.checked_component_total()?)?
            .checked_add(payslip.total_gross)
    });
    let bound = earnings.and_then(|earnings| {
        adjustments
            .iter()
            .try_fold(earnings, |sum, adjustment| sum.checked_add(adjustment.amount.abs()))
    });

    match bound {
        Some(_) => Ok(()),
        None if earnings.is_none() => Err(EngineError::AmountOutOfRange {
            message: format!(
                "combined earnings of {} payslips exceed the supported numeric range",
                payslips.len()
            ),
        }),
        None => Err(EngineError::AmountOutOfRange {
            message: "adjustments push the figure past the supported numeric range".to_string(),
        }),
    }
}
