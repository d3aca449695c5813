//! Core data models for the PIAWE engine.
//!
//! This module contains all the domain models used throughout the engine.

mod adjustment;
mod calculation_result;
mod jurisdiction;
mod payslip;
mod validation;

pub use adjustment::{AdjustmentType, PiaweAdjustment};
pub use calculation_result::{AuditStep, PiaweCalculation, PiaweResult};
pub use jurisdiction::Jurisdiction;
pub use payslip::PayslipEntry;
pub use validation::{IssueType, Severity, ValidationIssue};
