//! Final PIAWE resolution.
//!
//! This module picks between the 52-week and 13-week outcomes according to
//! each jurisdiction's fallback policy, applies the statutory cap, and folds
//! in manual adjustments.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{JurisdictionRules, fixed_reference_weeks};
use crate::models::{AuditStep, Jurisdiction, PiaweAdjustment, PiaweResult};

/// Coefficient of variation above which WA flags high fluctuation.
pub fn high_fluctuation_threshold() -> Decimal {
    Decimal::new(3, 1)
}

/// Minimum included weeks for each step of a jurisdiction's decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataThresholds {
    /// Weeks required in the 52-week period for the standard method.
    pub primary_weeks: u32,
    /// Weeks required in the 13-week period for the fallback, if one exists.
    pub fallback_weeks: Option<u32>,
}

/// Returns the decision-table thresholds for a jurisdiction.
///
/// TAS, NT, and ACT take their standard threshold from the rule table and
/// have no short-period fallback.
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::data_thresholds;
/// use piawe_engine::config::RuleTable;
/// use piawe_engine::models::Jurisdiction;
///
/// let rules = RuleTable::builtin().get_rules(Jurisdiction::Vic);
/// let thresholds = data_thresholds(Jurisdiction::Vic, rules);
/// assert_eq!(thresholds.primary_weeks, 20);
/// assert_eq!(thresholds.fallback_weeks, Some(4));
/// ```
pub fn data_thresholds(jurisdiction: Jurisdiction, rules: &JurisdictionRules) -> DataThresholds {
    let fallback_weeks = match jurisdiction {
        Jurisdiction::Nsw | Jurisdiction::Vic => Some(4),
        Jurisdiction::Qld | Jurisdiction::Sa => Some(8),
        Jurisdiction::Wa | Jurisdiction::Tas | Jurisdiction::Nt | Jurisdiction::Act => None,
    };
    let (fixed_minimum, _) = fixed_reference_weeks(jurisdiction);
    DataThresholds {
        primary_weeks: fixed_minimum.unwrap_or(rules.minimum_weeks_required),
        fallback_weeks,
    }
}

/// Which reference period produced the selected figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedPeriod {
    /// The 52-week standard method.
    Standard,
    /// The 13-week fallback.
    Fallback,
    /// Neither threshold was met; the period with more data was used.
    InsufficientData {
        /// The period length that was used.
        period_weeks: u32,
        /// Included weeks in that period.
        included_weeks: u32,
    },
}

/// The outcome of period selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSelection {
    /// The selected average, before capping and adjustments.
    pub value: Decimal,
    /// Human-readable description of the method.
    pub method_used: String,
    /// Which period was selected.
    pub period: SelectedPeriod,
}

/// Chooses between the 52-week and 13-week outcomes.
///
/// The jurisdiction's decision table is evaluated in order and the first
/// match wins. If no condition matches, the period with more included weeks
/// is used (52 weeks on a tie). This never fails; with no data at all it
/// selects zero.
pub fn select_period(
    period_52: &PiaweResult,
    period_13: &PiaweResult,
    rules: &JurisdictionRules,
    jurisdiction: Jurisdiction,
) -> PeriodSelection {
    let thresholds = data_thresholds(jurisdiction, rules);

    if period_52.included_weeks >= thresholds.primary_weeks {
        let mut method_used = format!("52-week average ({} standard)", jurisdiction);
        let high_fluctuation = period_52.fluctuation > high_fluctuation_threshold();
        if jurisdiction == Jurisdiction::Wa && high_fluctuation {
            method_used.push_str(&format!(
                " - high earnings fluctuation (CV {})",
                period_52.fluctuation.normalize()
            ));
        }
        return PeriodSelection {
            value: period_52.average_weekly,
            method_used,
            period: SelectedPeriod::Standard,
        };
    }

    if let Some(fallback_weeks) = thresholds.fallback_weeks {
        if period_13.included_weeks >= fallback_weeks {
            return PeriodSelection {
                value: period_13.average_weekly,
                method_used: format!("13-week average ({} fallback)", jurisdiction),
                period: SelectedPeriod::Fallback,
            };
        }
    }

    let best = if period_13.included_weeks > period_52.included_weeks {
        period_13
    } else {
        period_52
    };

    PeriodSelection {
        value: best.average_weekly,
        method_used: format!(
            "{}-week average over {} weeks of data (insufficient data)",
            best.total_weeks, best.included_weeks
        ),
        period: SelectedPeriod::InsufficientData {
            period_weeks: best.total_weeks,
            included_weeks: best.included_weeks,
        },
    }
}

/// Clamps a value to the jurisdiction's weekly ceiling.
///
/// Returns the capped value and whether the cap was applied. A value below
/// the cap is never raised.
pub fn apply_cap(value: Decimal, rules: &JurisdictionRules) -> (Decimal, bool) {
    match rules.weekly_cap() {
        Some(cap) if value > cap => (cap, true),
        _ => (value, false),
    }
}

/// Folds adjustments over a base value in list order.
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::apply_adjustments;
/// use piawe_engine::models::{AdjustmentType, PiaweAdjustment};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let adjustment = |adjustment_type, amount: i64| PiaweAdjustment {
///     adjustment_type,
///     amount: Decimal::from(amount),
///     description: String::new(),
///     reason: String::new(),
///     applied_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
/// };
///
/// let adjustments = [
///     adjustment(AdjustmentType::BaseRateIncrease, 10),
///     adjustment(AdjustmentType::ManualOverride, 900),
///     adjustment(AdjustmentType::IndustrialAgreement, 25),
/// ];
///
/// assert_eq!(apply_adjustments(Decimal::from(1000), &adjustments), Decimal::from(925));
/// ```
pub fn apply_adjustments(base: Decimal, adjustments: &[PiaweAdjustment]) -> Decimal {
    adjustments
        .iter()
        .fold(base, |running, adjustment| adjustment.apply(running))
}

/// The result of resolving the final figure, including audit steps.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    /// The figure after selection, capping, and adjustments.
    pub final_piawe: Decimal,
    /// The figure after selection and capping, before adjustments.
    pub capped_piawe: Decimal,
    /// Human-readable description of the method.
    pub method_used: String,
    /// Whether the weekly cap reduced the figure.
    pub cap_applied: bool,
    /// Audit steps for selection, capping, and each adjustment.
    pub audit_steps: Vec<AuditStep>,
}

/// Resolves the final PIAWE from both period outcomes.
///
/// Selection, then capping, then adjustments in list order.
pub fn resolve(
    period_52: &PiaweResult,
    period_13: &PiaweResult,
    rules: &JurisdictionRules,
    jurisdiction: Jurisdiction,
    adjustments: &[PiaweAdjustment],
    step_number: u32,
) -> ResolutionResult {
    let mut step_number = step_number;
    let mut audit_steps = Vec::with_capacity(2 + adjustments.len());

    let selection = select_period(period_52, period_13, rules, jurisdiction);
    let thresholds = data_thresholds(jurisdiction, rules);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "period_selection".to_string(),
        rule_name: "Reference Period Selection".to_string(),
        input: serde_json::json!({
            "jurisdiction": jurisdiction.code(),
            "included_weeks_52": period_52.included_weeks,
            "included_weeks_13": period_13.included_weeks,
            "primary_weeks_required": thresholds.primary_weeks,
            "fallback_weeks_required": thresholds.fallback_weeks,
            "fluctuation_52": period_52.fluctuation.normalize().to_string(),
        }),
        output: serde_json::json!({
            "value": selection.value.normalize().to_string(),
            "method_used": selection.method_used,
        }),
        reasoning: format!("Selected {}", selection.method_used),
    });
    step_number += 1;

    let (capped_piawe, cap_applied) = apply_cap(selection.value, rules);
    let cap = rules.weekly_cap();
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "weekly_cap".to_string(),
        rule_name: "Weekly Cap".to_string(),
        input: serde_json::json!({
            "value": selection.value.normalize().to_string(),
            "weekly_cap": cap.map(|c| c.normalize().to_string()),
        }),
        output: serde_json::json!({
            "value": capped_piawe.normalize().to_string(),
            "cap_applied": cap_applied,
        }),
        reasoning: match cap {
            Some(cap) if cap_applied => format!(
                "${} exceeds {} weekly cap; capped at ${}",
                selection.value.normalize(),
                jurisdiction,
                cap.normalize()
            ),
            Some(cap) => format!(
                "${} is within {} weekly cap of ${}",
                selection.value.normalize(),
                jurisdiction,
                cap.normalize()
            ),
            None => format!("{} does not cap PIAWE", jurisdiction),
        },
    });
    step_number += 1;

    let mut running = capped_piawe;
    for adjustment in adjustments {
        let before = running;
        running = adjustment.apply(running);
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "adjustment".to_string(),
            rule_name: "Manual Adjustment".to_string(),
            input: serde_json::json!({
                "type": adjustment.adjustment_type,
                "amount": adjustment.amount.normalize().to_string(),
                "description": adjustment.description,
                "applied_date": adjustment.applied_date.to_string(),
                "value_before": before.normalize().to_string(),
            }),
            output: serde_json::json!({
                "value": running.normalize().to_string(),
            }),
            reasoning: if adjustment.adjustment_type.replaces_value() {
                format!(
                    "Manual override replaces ${} with ${}",
                    before.normalize(),
                    running.normalize()
                )
            } else {
                let sign = if adjustment.amount < Decimal::ZERO { '-' } else { '+' };
                format!(
                    "${} {} ${} = ${}",
                    before.normalize(),
                    sign,
                    adjustment.amount.abs().normalize(),
                    running.normalize()
                )
            },
        });
        step_number += 1;
    }

    debug!(
        jurisdiction = %jurisdiction,
        method_used = %selection.method_used,
        cap_applied,
        adjustments = adjustments.len(),
        final_piawe = %running,
        "Resolved final PIAWE"
    );

    ResolutionResult {
        final_piawe: running,
        capped_piawe,
        method_used: selection.method_used,
        cap_applied,
        audit_steps,
    }
}
