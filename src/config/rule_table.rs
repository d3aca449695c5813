//! The jurisdiction rule table.
//!
//! A [`RuleTable`] holds exactly one [`JurisdictionRules`] per
//! [`Jurisdiction`]. The built-in table is created once on first use and is
//! never mutated; deployments that need different figures load their own
//! table with [`ConfigLoader`](super::ConfigLoader).

use std::sync::LazyLock;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::Jurisdiction;

use super::types::{BonusInclusions, CappingRules, JurisdictionRules};

static BUILTIN: LazyLock<RuleTable> = LazyLock::new(|| RuleTable {
    rules: builtin_rules(),
});

/// Read-only lookup of per-jurisdiction rules.
///
/// # Example
///
/// ```
/// use piawe_engine::config::RuleTable;
/// use piawe_engine::models::Jurisdiction;
///
/// let rules = RuleTable::builtin().get_rules(Jurisdiction::Vic);
/// assert_eq!(rules.minimum_weeks_required, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    /// Indexed by [`Jurisdiction::index`].
    rules: Vec<JurisdictionRules>,
}

impl RuleTable {
    /// Returns the built-in rule table.
    pub fn builtin() -> &'static RuleTable {
        &BUILTIN
    }

    /// Builds a table from a list of rule sets in any order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRuleTable`] if a jurisdiction is missing or
    /// duplicated, a default reference period is not 52 weeks, a cap is
    /// negative, or the week thresholds disagree with the fixed decision table
    /// (see [`fixed_reference_weeks`]).
    pub fn new(rule_sets: Vec<JurisdictionRules>) -> EngineResult<Self> {
        let mut slots: Vec<Option<JurisdictionRules>> = vec![None; Jurisdiction::ALL.len()];

        for rules in rule_sets {
            check_rule_set(&rules)?;
            let slot = &mut slots[rules.jurisdiction.index()];
            if slot.is_some() {
                return Err(EngineError::InvalidRuleTable {
                    message: format!("duplicate rule set for {}", rules.jurisdiction),
                });
            }
            *slot = Some(rules);
        }

        let rules = Jurisdiction::ALL
            .into_iter()
            .zip(slots)
            .map(|(jurisdiction, slot)| {
                slot.ok_or_else(|| EngineError::InvalidRuleTable {
                    message: format!("missing rule set for {}", jurisdiction),
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Returns the rules for a jurisdiction.
    pub fn get_rules(&self, jurisdiction: Jurisdiction) -> &JurisdictionRules {
        &self.rules[jurisdiction.index()]
    }

    /// Iterates over every rule set in jurisdiction order.
    pub fn iter(&self) -> impl Iterator<Item = &JurisdictionRules> {
        self.rules.iter()
    }
}

/// The minimum weeks and fallback periods fixed in the decision table.
///
/// NSW, VIC, QLD, WA, and SA thresholds are statutory and do not come from the
/// table, so a table may only restate them. TAS, NT, and ACT take their
/// minimum from the table and never have a fallback period.
pub fn fixed_reference_weeks(jurisdiction: Jurisdiction) -> (Option<u32>, &'static [u32]) {
    const SHORT_FALLBACK: &[u32] = &[13];
    const NO_FALLBACK: &[u32] = &[];

    match jurisdiction {
        Jurisdiction::Nsw | Jurisdiction::Qld | Jurisdiction::Sa => (Some(26), SHORT_FALLBACK),
        Jurisdiction::Vic => (Some(20), SHORT_FALLBACK),
        Jurisdiction::Wa => (Some(26), NO_FALLBACK),
        Jurisdiction::Tas | Jurisdiction::Nt | Jurisdiction::Act => (None, NO_FALLBACK),
    }
}

fn check_rule_set(rules: &JurisdictionRules) -> EngineResult<()> {
    if rules.default_reference_period != 52 {
        return Err(EngineError::InvalidRuleTable {
            message: format!(
                "{} default reference period must be 52 weeks, got {}",
                rules.jurisdiction, rules.default_reference_period
            ),
        });
    }

    let (minimum_weeks, fallback_periods) = fixed_reference_weeks(rules.jurisdiction);
    if let Some(minimum_weeks) =
        minimum_weeks.filter(|weeks| *weeks != rules.minimum_weeks_required)
    {
        return Err(EngineError::InvalidRuleTable {
            message: format!(
                "{} minimum weeks required is fixed at {}, got {}",
                rules.jurisdiction, minimum_weeks, rules.minimum_weeks_required
            ),
        });
    }
    if rules.alternative_reference_periods != fallback_periods {
        return Err(EngineError::InvalidRuleTable {
            message: format!(
                "{} alternative reference periods are fixed at {:?}, got {:?}",
                rules.jurisdiction, fallback_periods, rules.alternative_reference_periods
            ),
        });
    }

    if let Some(caps) = &rules.capping_rules {
        let negative = [caps.max_weekly_amount, caps.max_annual_amount]
            .into_iter()
            .flatten()
            .any(|cap| cap < Decimal::ZERO);
        if negative {
            return Err(EngineError::InvalidRuleTable {
                message: format!("{} caps must not be negative", rules.jurisdiction),
            });
        }
    }

    Ok(())
}

fn allowances(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn weekly_cap(cents: i64) -> Option<CappingRules> {
    Some(CappingRules {
        max_weekly_amount: Some(Decimal::new(cents, 2)),
        max_annual_amount: None,
    })
}

// Ordered to match Jurisdiction::ALL.
fn builtin_rules() -> Vec<JurisdictionRules> {
    let all_bonuses = BonusInclusions {
        regular: true,
        performance: true,
        annual: true,
    };

    vec![
        JurisdictionRules {
            jurisdiction: Jurisdiction::Nsw,
            name: "New South Wales".to_string(),
            default_reference_period: 52,
            alternative_reference_periods: vec![13],
            minimum_weeks_required: 26,
            allowance_inclusions: allowances(&["shift", "site", "tool", "travel"]),
            bonus_inclusions: BonusInclusions {
                regular: true,
                performance: false,
                annual: false,
            },
            capping_rules: weekly_cap(250_000),
        },
        JurisdictionRules {
            jurisdiction: Jurisdiction::Vic,
            name: "Victoria".to_string(),
            default_reference_period: 52,
            alternative_reference_periods: vec![13],
            minimum_weeks_required: 20,
            allowance_inclusions: allowances(&["shift", "site", "tool"]),
            bonus_inclusions: all_bonuses,
            capping_rules: Some(CappingRules {
                max_weekly_amount: Some(Decimal::new(240_000, 2)),
                max_annual_amount: Some(Decimal::new(12_480_000, 2)),
            }),
        },
        JurisdictionRules {
            jurisdiction: Jurisdiction::Qld,
            name: "Queensland".to_string(),
            default_reference_period: 52,
            alternative_reference_periods: vec![13],
            minimum_weeks_required: 26,
            allowance_inclusions: allowances(&["shift", "site", "tool", "travel", "meal"]),
            bonus_inclusions: all_bonuses,
            capping_rules: None,
        },
        JurisdictionRules {
            jurisdiction: Jurisdiction::Wa,
            name: "Western Australia".to_string(),
            default_reference_period: 52,
            alternative_reference_periods: vec![],
            minimum_weeks_required: 26,
            allowance_inclusions: allowances(&["shift", "site", "district"]),
            bonus_inclusions: all_bonuses,
            capping_rules: None,
        },
        JurisdictionRules {
            jurisdiction: Jurisdiction::Sa,
            name: "South Australia".to_string(),
            default_reference_period: 52,
            alternative_reference_periods: vec![13],
            minimum_weeks_required: 26,
            allowance_inclusions: allowances(&["shift", "site"]),
            bonus_inclusions: all_bonuses,
            capping_rules: weekly_cap(230_000),
        },
        JurisdictionRules {
            jurisdiction: Jurisdiction::Tas,
            name: "Tasmania".to_string(),
            default_reference_period: 52,
            alternative_reference_periods: vec![],
            minimum_weeks_required: 26,
            allowance_inclusions: allowances(&["shift", "site"]),
            bonus_inclusions: all_bonuses,
            capping_rules: None,
        },
        JurisdictionRules {
            jurisdiction: Jurisdiction::Nt,
            name: "Northern Territory".to_string(),
            default_reference_period: 52,
            alternative_reference_periods: vec![],
            minimum_weeks_required: 13,
            allowance_inclusions: vec![],
            bonus_inclusions: all_bonuses,
            capping_rules: None,
        },
        JurisdictionRules {
            jurisdiction: Jurisdiction::Act,
            name: "Australian Capital Territory".to_string(),
            default_reference_period: 52,
            alternative_reference_periods: vec![],
            minimum_weeks_required: 26,
            allowance_inclusions: vec![],
            bonus_inclusions: all_bonuses,
            capping_rules: None,
        },
    ]
}
