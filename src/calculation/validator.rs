//! Payslip data-quality checks.
//!
//! Every check runs and every finding is returned. Findings annotate the
//! calculation; none of them stops it.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::JurisdictionRules;
use crate::models::{IssueType, Jurisdiction, PayslipEntry, ValidationIssue};

use super::period::{in_window, window_start, SHORT_PERIOD_WEEKS, STANDARD_PERIOD_WEEKS};
use super::resolver::data_thresholds;

/// Deviation from the mean (as a fraction) that WA treats as extreme.
pub fn wa_fluctuation_threshold() -> Decimal {
    Decimal::new(4, 1)
}

/// Deviation from the mean (as a fraction) treated as extreme everywhere.
pub fn general_fluctuation_threshold() -> Decimal {
    Decimal::new(6, 1)
}

/// Gross above this multiple of the declared components suggests
/// superannuation was folded into the gross figure.
pub fn gross_tolerance() -> Decimal {
    Decimal::new(11, 1)
}

/// Largest gap in days between consecutive weekly payslips.
pub const MAX_PAYSLIP_GAP_DAYS: i64 = 7;

/// Largest gap in days between the latest payslip and the injury date.
pub const MAX_TRAILING_GAP_DAYS: i64 = 14;

/// Runs every data-quality check over a payslip set.
///
/// `payslips` may be in any order.
pub fn validate(
    payslips: &[PayslipEntry],
    injury_date: NaiveDate,
    rules: &JurisdictionRules,
    jurisdiction: Jurisdiction,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_data_sufficiency(payslips, injury_date, rules, jurisdiction, &mut issues);
    check_fluctuation(payslips, injury_date, jurisdiction, &mut issues);
    check_gross_reconciles(payslips, &mut issues);
    check_missing_weeks(payslips, injury_date, &mut issues);

    issues
}

fn working_weeks_in_window(
    payslips: &[PayslipEntry],
    injury_date: NaiveDate,
    period_weeks: u32,
) -> usize {
    let start = window_start(injury_date, period_weeks);
    payslips
        .iter()
        .filter(|p| !p.unpaid_leave && in_window(p.week_ending, start, injury_date))
        .count()
}

fn sufficiency_action(jurisdiction: Jurisdiction, rules: &JurisdictionRules) -> String {
    match jurisdiction {
        Jurisdiction::Nsw => "Obtain payslips for at least 26 of the 52 weeks before injury; \
             otherwise at least 4 weeks within the last 13 are needed for the short-period average"
            .to_string(),
        Jurisdiction::Vic => "Obtain payslips for at least 20 of the 52 weeks before injury; \
             otherwise at least 4 weeks within the last 13 are needed for the short-period average"
            .to_string(),
        Jurisdiction::Qld | Jurisdiction::Sa => format!(
            "Obtain payslips for at least 26 of the 52 weeks before injury; \
             otherwise at least 8 weeks within the last 13 are needed under {} rules",
            jurisdiction
        ),
        Jurisdiction::Wa => "WA has no short-period fallback; obtain payslips for at least \
             26 of the 52 weeks before injury or a wage statement from the employer"
            .to_string(),
        Jurisdiction::Tas | Jurisdiction::Nt | Jurisdiction::Act => format!(
            "Obtain payslips for at least {} of the 52 weeks before injury from the employer",
            rules.minimum_weeks_required
        ),
    }
}

fn check_data_sufficiency(
    payslips: &[PayslipEntry],
    injury_date: NaiveDate,
    rules: &JurisdictionRules,
    jurisdiction: Jurisdiction,
    issues: &mut Vec<ValidationIssue>,
) {
    let thresholds = data_thresholds(jurisdiction, rules);
    let weeks_52 = working_weeks_in_window(payslips, injury_date, STANDARD_PERIOD_WEEKS);
    if weeks_52 >= thresholds.primary_weeks as usize {
        return;
    }

    let message = match thresholds.fallback_weeks {
        Some(fallback_weeks) => {
            let weeks_13 = working_weeks_in_window(payslips, injury_date, SHORT_PERIOD_WEEKS);
            format!(
                "Only {} working weeks in the 52 weeks before injury ({} requires {}); \
                 {} in the last 13 weeks ({} needed for the fallback)",
                weeks_52, jurisdiction, thresholds.primary_weeks, weeks_13, fallback_weeks
            )
        }
        None => format!(
            "Only {} working weeks in the 52 weeks before injury ({} requires {})",
            weeks_52, jurisdiction, thresholds.primary_weeks
        ),
    };

    issues.push(
        ValidationIssue::warning(IssueType::InsufficientData, message)
            .with_suggested_action(sufficiency_action(jurisdiction, rules)),
    );
}

fn check_fluctuation(
    payslips: &[PayslipEntry],
    injury_date: NaiveDate,
    jurisdiction: Jurisdiction,
    issues: &mut Vec<ValidationIssue>,
) {
    let start = window_start(injury_date, STANDARD_PERIOD_WEEKS);
    let weeks: Vec<&PayslipEntry> = payslips
        .iter()
        .filter(|p| !p.unpaid_leave && in_window(p.week_ending, start, injury_date))
        .collect();
    if weeks.len() < 2 {
        return;
    }

    let count = Decimal::from(weeks.len());
    let mean = match weeks
        .iter()
        .try_fold(Decimal::ZERO, |sum, p| sum.checked_add(p.total_gross))
    {
        Some(sum) => sum / count,
        None => match weeks
            .iter()
            .try_fold(Decimal::ZERO, |sum, p| sum.checked_add(p.total_gross / count))
        {
            Some(mean) => mean,
            None => return,
        },
    };
    if mean <= Decimal::ZERO {
        return;
    }

    // Largest relative deviation; the first entry wins a tie.
    let Some((week, deviation)) = weeks
        .iter()
        .filter_map(|p| Some((*p, (p.total_gross - mean).abs().checked_div(mean)?)))
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
    else {
        return;
    };

    let mut flag = |threshold: Decimal, label: &str| {
        if deviation > threshold {
            let percent = (deviation * Decimal::ONE_HUNDRED).round_dp(1).normalize();
            issues.push(
                ValidationIssue::warning(
                    IssueType::ExtremeFluctuation,
                    format!(
                        "{}: week ending {} gross ${} deviates {}% from the mean of ${}",
                        label,
                        week.week_ending,
                        week.total_gross.normalize(),
                        percent,
                        mean.round_dp(2).normalize()
                    ),
                )
                .with_suggested_action(
                    "Confirm the week's earnings with the employer and check whether \
                     a one-off payment should be excluded",
                )
                .with_week_ending(week.week_ending),
            );
        }
    };

    if jurisdiction == Jurisdiction::Wa {
        flag(wa_fluctuation_threshold(), "WA earnings fluctuation above 40%");
    }
    flag(general_fluctuation_threshold(), "Earnings fluctuation above 60%");
}

fn check_gross_reconciles(payslips: &[PayslipEntry], issues: &mut Vec<ValidationIssue>) {
    for payslip in payslips {
        let Some(components) = payslip.checked_component_total() else {
            continue;
        };
        // A limit past Decimal::MAX cannot be exceeded.
        let limit = components.checked_mul(gross_tolerance());
        if limit.is_some_and(|limit| payslip.total_gross > limit) {
            issues.push(
                ValidationIssue::error(
                    IssueType::InconsistentRates,
                    format!(
                        "Payslip {} gross ${} exceeds its declared components ${} by more than 10%",
                        payslip.id,
                        payslip.total_gross.normalize(),
                        components.normalize()
                    ),
                )
                .with_suggested_action(
                    "Check whether superannuation was included in gross pay and remove it",
                )
                .with_week_ending(payslip.week_ending),
            );
        }
    }
}

fn check_missing_weeks(
    payslips: &[PayslipEntry],
    injury_date: NaiveDate,
    issues: &mut Vec<ValidationIssue>,
) {
    let start = window_start(injury_date, STANDARD_PERIOD_WEEKS);
    let mut dates: Vec<NaiveDate> = payslips
        .iter()
        .map(|p| p.week_ending)
        .filter(|d| in_window(*d, start, injury_date))
        .collect();
    dates.sort_unstable();
    dates.dedup();

    for pair in dates.windows(2) {
        let gap = (pair[1] - pair[0]).num_days();
        if gap > MAX_PAYSLIP_GAP_DAYS {
            issues.push(
                ValidationIssue::warning(
                    IssueType::MissingWeeks,
                    format!(
                        "No payslips between week ending {} and week ending {} ({} days)",
                        pair[0], pair[1], gap
                    ),
                )
                .with_suggested_action(
                    "Request the missing payslips or confirm the weeks were not worked",
                )
                .with_week_ending(pair[0]),
            );
        }
    }

    if let Some(latest) = dates.last() {
        let trailing = (injury_date - *latest).num_days();
        if trailing > MAX_TRAILING_GAP_DAYS {
            issues.push(
                ValidationIssue::warning(
                    IssueType::MissingWeeks,
                    format!(
                        "Latest payslip ends {} days before the injury date (week ending {})",
                        trailing, latest
                    ),
                )
                .with_suggested_action("Request payslips for the weeks immediately before injury")
                .with_week_ending(*latest),
            );
        }
    }
}
