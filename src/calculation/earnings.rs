//! Earnings aggregation.
//!
//! This module sums a set of working weeks into categorised totals, applying
//! each jurisdiction's inclusion rules for overtime, allowances, and bonuses.
//!
//! The overtime and bonus regularity tests are window-presence counts over the
//! most recent weeks of the set being aggregated, not statistical tests.

use rust_decimal::Decimal;

use crate::config::JurisdictionRules;
use crate::models::{Jurisdiction, PayslipEntry};

/// Weeks examined by the NSW/VIC "regular overtime" test.
pub const REGULAR_OVERTIME_WINDOW: usize = 8;

/// Weeks examined by the QLD/WA/SA "consistent overtime" test.
pub const CONSISTENT_OVERTIME_WINDOW: usize = 12;

/// Weeks examined by the NSW bonus regularity test.
pub const BONUS_REGULARITY_WINDOW: usize = 12;

/// Non-zero bonuses required within [`BONUS_REGULARITY_WINDOW`] for NSW.
pub const BONUS_REGULARITY_MIN_OCCURRENCES: usize = 3;

/// How a jurisdiction decides whether overtime counts as earnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OvertimeRule {
    /// Overtime in at least 50% of the most recent 8 weeks.
    Regular,
    /// Overtime in at least 40% of the most recent 12 weeks.
    Consistent,
    /// All overtime counts.
    Unconditional,
}

impl OvertimeRule {
    /// The overtime rule for a jurisdiction.
    pub fn for_jurisdiction(jurisdiction: Jurisdiction) -> Self {
        match jurisdiction {
            Jurisdiction::Nsw | Jurisdiction::Vic => OvertimeRule::Regular,
            Jurisdiction::Qld | Jurisdiction::Wa | Jurisdiction::Sa => OvertimeRule::Consistent,
            Jurisdiction::Tas | Jurisdiction::Nt | Jurisdiction::Act => {
                OvertimeRule::Unconditional
            }
        }
    }

    /// Applies the rule to weeks ordered most recent first.
    pub fn is_satisfied(self, recent_first: &[PayslipEntry]) -> bool {
        let has_overtime = |p: &PayslipEntry| p.overtime_earnings() > Decimal::ZERO;
        match self {
            OvertimeRule::Regular => {
                presence_at_least(recent_first, REGULAR_OVERTIME_WINDOW, has_overtime, 1, 2)
            }
            OvertimeRule::Consistent => {
                presence_at_least(recent_first, CONSISTENT_OVERTIME_WINDOW, has_overtime, 2, 5)
            }
            OvertimeRule::Unconditional => true,
        }
    }
}

/// Returns true if `predicate` holds in at least `num/den` of the most recent
/// `window` weeks. With fewer weeks than the window, the ratio is taken over
/// the weeks present; an empty set never qualifies.
fn presence_at_least<F>(
    recent_first: &[PayslipEntry],
    window: usize,
    predicate: F,
    num: usize,
    den: usize,
) -> bool
where
    F: Fn(&PayslipEntry) -> bool,
{
    let recent = &recent_first[..recent_first.len().min(window)];
    if recent.is_empty() {
        return false;
    }
    let present = recent.iter().filter(|p| predicate(p)).count();
    present * den >= recent.len() * num
}

/// Returns true if bonuses in this set count as earnings.
///
/// NSW requires at least three non-zero bonuses in the most recent twelve
/// weeks; every other jurisdiction includes bonuses unconditionally.
pub fn bonuses_regular(jurisdiction: Jurisdiction, recent_first: &[PayslipEntry]) -> bool {
    if jurisdiction != Jurisdiction::Nsw {
        return true;
    }
    recent_first
        .iter()
        .take(BONUS_REGULARITY_WINDOW)
        .filter(|p| p.bonuses > Decimal::ZERO)
        .count()
        >= BONUS_REGULARITY_MIN_OCCURRENCES
}

/// Categorised earnings for a set of working weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedTotals {
    /// Ordinary hours multiplied by ordinary rates.
    pub ordinary: Decimal,
    /// Included overtime.
    pub overtime: Decimal,
    /// Included allowances.
    pub allowances: Decimal,
    /// Included bonuses.
    pub bonuses: Decimal,
    /// Commissions.
    pub commissions: Decimal,
    /// Piece rates and other income.
    pub other_income: Decimal,
    /// Sum of all included categories.
    pub total: Decimal,
    /// Included earnings for each week, in input order.
    pub weekly_totals: Vec<Decimal>,
    /// Whether overtime passed the jurisdiction's regularity test.
    pub overtime_included: bool,
    /// Whether allowances passed the jurisdiction's inclusion gate.
    pub allowances_included: bool,
    /// Whether bonuses passed the jurisdiction's regularity test.
    pub bonuses_included: bool,
}

/// Sums working weeks into categorised totals.
///
/// `payslips` must be working weeks only (no unpaid leave), ordered most
/// recent first: the regularity tests look at the head of the slice.
///
/// # Example
///
/// ```
/// use piawe_engine::calculation::aggregate;
/// use piawe_engine::config::RuleTable;
/// use piawe_engine::models::{Jurisdiction, PayslipEntry};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let week = PayslipEntry {
///     id: "ps_001".to_string(),
///     week_ending: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
///     ordinary_hours: Decimal::from(38),
///     ordinary_rate: Decimal::from(30),
///     overtime_hours: Decimal::ZERO,
///     overtime_rate: Decimal::ZERO,
///     allowances: Decimal::from(20),
///     bonuses: Decimal::ZERO,
///     commissions: Decimal::ZERO,
///     other_income: Decimal::ZERO,
///     total_gross: Decimal::from(1160),
///     unpaid_leave: false,
/// };
///
/// let rules = RuleTable::builtin().get_rules(Jurisdiction::Act);
/// let totals = aggregate(&[week], Jurisdiction::Act, rules);
///
/// // ACT excludes allowances.
/// assert_eq!(totals.total, Decimal::from(1140));
/// ```
pub fn aggregate(
    payslips: &[PayslipEntry],
    jurisdiction: Jurisdiction,
    rules: &JurisdictionRules,
) -> CategorizedTotals {
    let overtime_included = OvertimeRule::for_jurisdiction(jurisdiction).is_satisfied(payslips);
    let allowances_included = rules.includes_allowances();
    let bonuses_included = bonuses_regular(jurisdiction, payslips);

    let mut totals = CategorizedTotals {
        ordinary: Decimal::ZERO,
        overtime: Decimal::ZERO,
        allowances: Decimal::ZERO,
        bonuses: Decimal::ZERO,
        commissions: Decimal::ZERO,
        other_income: Decimal::ZERO,
        total: Decimal::ZERO,
        weekly_totals: Vec::with_capacity(payslips.len()),
        overtime_included,
        allowances_included,
        bonuses_included,
    };

    for payslip in payslips {
        let ordinary = payslip.ordinary_earnings();
        let overtime = included_or_zero(overtime_included, payslip.overtime_earnings());
        let allowances = included_or_zero(allowances_included, payslip.allowances);
        let bonuses = included_or_zero(bonuses_included, payslip.bonuses);

        totals.ordinary += ordinary;
        totals.overtime += overtime;
        totals.allowances += allowances;
        totals.bonuses += bonuses;
        totals.commissions += payslip.commissions;
        totals.other_income += payslip.other_income;
        totals.weekly_totals.push(
            ordinary + overtime + allowances + bonuses + payslip.commissions + payslip.other_income,
        );
    }

    totals.total = totals.ordinary
        + totals.overtime
        + totals.allowances
        + totals.bonuses
        + totals.commissions
        + totals.other_income;

    totals
}

fn included_or_zero(included: bool, amount: Decimal) -> Decimal {
    if included { amount } else { Decimal::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleTable;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Builds `count` weeks, most recent first, with overtime in the weeks
    /// whose index is in `overtime_weeks`.
    fn create_weeks(
        count: usize,
        overtime_weeks: &[usize],
        bonus_weeks: &[usize],
    ) -> Vec<PayslipEntry> {
        let latest = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        (0..count)
            .map(|i| PayslipEntry {
                id: format!("ps_{:03}", i),
                week_ending: latest - chrono::Days::new(7 * i as u64),
                ordinary_hours: dec("38"),
                ordinary_rate: dec("30.00"),
                overtime_hours: if overtime_weeks.contains(&i) {
                    dec("2")
                } else {
                    Decimal::ZERO
                },
                overtime_rate: dec("45.00"),
                allowances: dec("10.00"),
                bonuses: if bonus_weeks.contains(&i) {
                    dec("100.00")
                } else {
                    Decimal::ZERO
                },
                commissions: dec("5.00"),
                other_income: dec("1.00"),
                total_gross: dec("1156.00"),
                unpaid_leave: false,
            })
            .collect()
    }

    fn rules(jurisdiction: Jurisdiction) -> &'static JurisdictionRules {
        RuleTable::builtin().get_rules(jurisdiction)
    }

    #[test]
    fn test_ordinary_and_unconditional_categories() {
        let weeks = create_weeks(4, &[], &[]);
        let totals = aggregate(&weeks, Jurisdiction::Tas, rules(Jurisdiction::Tas));

        assert_eq!(totals.ordinary, dec("4560.00"));
        assert_eq!(totals.allowances, dec("40.00"));
        assert_eq!(totals.commissions, dec("20.00"));
        assert_eq!(totals.other_income, dec("4.00"));
        assert_eq!(totals.total, dec("4624.00"));
        assert_eq!(totals.weekly_totals, vec![dec("1156.00"); 4]);
    }

    #[test]
    fn test_nsw_regular_overtime_at_half_of_recent_eight() {
        // 4 of the most recent 8 weeks have overtime: exactly 50%.
        let weeks = create_weeks(10, &[0, 2, 4, 6], &[]);
        let totals = aggregate(&weeks, Jurisdiction::Nsw, rules(Jurisdiction::Nsw));

        assert!(totals.overtime_included);
        assert_eq!(totals.overtime, dec("360.00"));
    }

    #[test]
    fn test_vic_irregular_overtime_excluded() {
        // 3 of 8 recent weeks; overtime further back does not count.
        let weeks = create_weeks(12, &[0, 3, 6, 8, 9, 10, 11], &[]);
        let totals = aggregate(&weeks, Jurisdiction::Vic, rules(Jurisdiction::Vic));

        assert!(!totals.overtime_included);
        assert_eq!(totals.overtime, Decimal::ZERO);
        assert_eq!(
            totals.total,
            totals.ordinary + totals.allowances + totals.commissions + totals.other_income
        );
    }

    #[test]
    fn test_qld_consistent_overtime_at_forty_percent_of_recent_twelve() {
        // 5 of 12 is 41.7%.
        let weeks = create_weeks(12, &[0, 1, 2, 3, 4], &[]);
        let totals = aggregate(&weeks, Jurisdiction::Qld, rules(Jurisdiction::Qld));
        assert!(totals.overtime_included);

        // 4 of 12 is 33.3%.
        let weeks = create_weeks(12, &[0, 1, 2, 3], &[]);
        let totals = aggregate(&weeks, Jurisdiction::Qld, rules(Jurisdiction::Qld));
        assert!(!totals.overtime_included);
    }

    #[test]
    fn test_short_history_ratio_uses_weeks_present() {
        // 2 of 5 weeks is 40%.
        let weeks = create_weeks(5, &[1, 3], &[]);
        let totals = aggregate(&weeks, Jurisdiction::Sa, rules(Jurisdiction::Sa));
        assert!(totals.overtime_included);
    }

    #[test]
    fn test_act_includes_all_overtime() {
        let weeks = create_weeks(12, &[11], &[]);
        let totals = aggregate(&weeks, Jurisdiction::Act, rules(Jurisdiction::Act));
        assert!(totals.overtime_included);
        assert_eq!(totals.overtime, dec("90.00"));
    }

    #[test]
    fn test_nt_excludes_allowances() {
        let weeks = create_weeks(3, &[], &[]);
        let totals = aggregate(&weeks, Jurisdiction::Nt, rules(Jurisdiction::Nt));
        assert!(!totals.allowances_included);
        assert_eq!(totals.allowances, Decimal::ZERO);
    }

    #[test]
    fn test_nsw_bonus_requires_three_recent_occurrences() {
        let weeks = create_weeks(12, &[], &[1, 5, 11]);
        let totals = aggregate(&weeks, Jurisdiction::Nsw, rules(Jurisdiction::Nsw));
        assert!(totals.bonuses_included);
        assert_eq!(totals.bonuses, dec("300.00"));

        let weeks = create_weeks(14, &[], &[1, 5, 13]);
        let totals = aggregate(&weeks, Jurisdiction::Nsw, rules(Jurisdiction::Nsw));
        assert!(!totals.bonuses_included);
        assert_eq!(totals.bonuses, Decimal::ZERO);
    }

    #[test]
    fn test_other_jurisdictions_include_single_bonus() {
        let weeks = create_weeks(12, &[], &[7]);
        let totals = aggregate(&weeks, Jurisdiction::Wa, rules(Jurisdiction::Wa));
        assert_eq!(totals.bonuses, dec("100.00"));
    }

    #[test]
    fn test_empty_set_has_zero_totals() {
        let totals = aggregate(&[], Jurisdiction::Nsw, rules(Jurisdiction::Nsw));
        assert_eq!(totals.total, Decimal::ZERO);
        assert!(totals.weekly_totals.is_empty());
        assert!(!totals.overtime_included);
    }
}
