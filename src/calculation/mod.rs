//! Calculation logic for the PIAWE engine.
//!
//! This module contains earnings aggregation under each jurisdiction's
//! inclusion rules, reference-period averaging, final figure resolution
//! (fallback, capping, adjustments), payslip validation, and the
//! orchestrator that ties them together.

mod earnings;
mod orchestrator;
mod period;
mod resolver;
mod validator;

pub use earnings::{
    BONUS_REGULARITY_MIN_OCCURRENCES, BONUS_REGULARITY_WINDOW, CONSISTENT_OVERTIME_WINDOW,
    CategorizedTotals, OvertimeRule, REGULAR_OVERTIME_WINDOW, aggregate, bonuses_regular,
};
pub use orchestrator::{calculate, calculate_piawe, calculate_piawe_with_rules, parse_injury_date};
pub use period::{
    PeriodCalculationResult, SHORT_PERIOD_WEEKS, STANDARD_PERIOD_WEEKS, calculate_for_period,
    coefficient_of_variation, in_window, window_start,
};
pub use resolver::{
    DataThresholds, PeriodSelection, ResolutionResult, SelectedPeriod, apply_adjustments,
    apply_cap, data_thresholds, high_fluctuation_threshold, resolve, select_period,
};
pub use validator::{
    MAX_PAYSLIP_GAP_DAYS, MAX_TRAILING_GAP_DAYS, general_fluctuation_threshold, gross_tolerance,
    validate, wa_fluctuation_threshold,
};
