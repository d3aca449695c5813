//! Pre-Injury Average Weekly Earnings (PIAWE) engine
//!
//! This crate calculates the statutory PIAWE figure for Australian workers'
//! compensation claims across all eight state and territory schemes. Given a
//! worker's weekly payslips, an injury date, and a jurisdiction, it averages
//! earnings over the 52-week and 13-week reference periods, picks the figure
//! the jurisdiction prescribes, applies any weekly cap and manual
//! adjustments, and flags data-quality problems along the way.
//!
//! # Example
//!
//! ```
//! use piawe_engine::calculation::calculate_piawe;
//! use piawe_engine::models::PayslipEntry;
//! use chrono::{Days, NaiveDate};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let injury = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
//! let payslips: Vec<PayslipEntry> = (1..=30)
//!     .map(|week| PayslipEntry {
//!         id: format!("ps_{week:03}"),
//!         week_ending: injury - Days::new(7 * week),
//!         ordinary_hours: Decimal::from(38),
//!         ordinary_rate: Decimal::from_str("28.50").unwrap(),
//!         overtime_hours: Decimal::ZERO,
//!         overtime_rate: Decimal::ZERO,
//!         allowances: Decimal::ZERO,
//!         bonuses: Decimal::ZERO,
//!         commissions: Decimal::ZERO,
//!         other_income: Decimal::ZERO,
//!         total_gross: Decimal::from_str("1083.00").unwrap(),
//!         unpaid_leave: false,
//!     })
//!     .collect();
//!
//! let calculation = calculate_piawe(&payslips, "2024-07-01", "NSW", &[]).unwrap();
//! assert_eq!(calculation.final_piawe, Decimal::from(1083));
//! assert_eq!(calculation.method_used, "52-week average (NSW standard)");
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
