//! Validation findings.
//!
//! Findings annotate a calculation; they never stop one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    /// Not enough weeks of history for the jurisdiction's preferred method.
    InsufficientData,
    /// Weekly earnings swing far from the mean.
    ExtremeFluctuation,
    /// Payslip figures do not reconcile with each other.
    InconsistentRates,
    /// Gaps in the weekly payslip sequence.
    MissingWeeks,
}

/// How seriously a finding should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory.
    Warning,
    /// Likely a data error the caller should resolve before relying on the figure.
    Error,
}

/// A finding produced by the validator.
///
/// # Example
///
/// ```
/// use piawe_engine::models::{IssueType, Severity, ValidationIssue};
///
/// let issue = ValidationIssue::warning(
///     IssueType::InsufficientData,
///     "Only 10 weeks of payslips available",
/// )
/// .with_suggested_action("Request earlier payslips from the employer");
///
/// assert_eq!(issue.severity, Severity::Warning);
/// assert!(issue.suggested_action.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The category of the finding.
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// The severity of the finding.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// What the case manager should do about it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// The week the finding relates to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_ending: Option<NaiveDate>,
}

impl ValidationIssue {
    /// Creates a finding with the given severity.
    pub fn new(issue_type: IssueType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            suggested_action: None,
            week_ending: None,
        }
    }

    /// Creates a warning.
    pub fn warning(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self::new(issue_type, Severity::Warning, message)
    }

    /// Creates an error-severity finding.
    pub fn error(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self::new(issue_type, Severity::Error, message)
    }

    /// Attaches a suggested action.
    pub fn with_suggested_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }

    /// Attaches the week the finding relates to.
    pub fn with_week_ending(mut self, week_ending: NaiveDate) -> Self {
        self.week_ending = Some(week_ending);
        self
    }
}
