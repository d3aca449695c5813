//! Error types for the PIAWE engine.
//!
//! Only caller contract violations are errors. Data-quality problems such as
//! short histories or suspicious gross figures are reported as
//! [`ValidationIssue`](crate::models::ValidationIssue)s on the result instead.

use thiserror::Error;

/// The main error type for the PIAWE engine.
///
/// # Example
///
/// ```
/// use piawe_engine::error::EngineError;
///
/// let error = EngineError::UnknownJurisdiction {
///     code: "XYZ".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown jurisdiction code: XYZ");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rule table parsed correctly but breaks a table invariant.
    #[error("Invalid jurisdiction rule table: {message}")]
    InvalidRuleTable {
        /// What was wrong with the table.
        message: String,
    },

    /// The jurisdiction code is not one of the eight supported codes.
    #[error("Unknown jurisdiction code: {code}")]
    UnknownJurisdiction {
        /// The rejected code.
        code: String,
    },

    /// The injury date was not a valid ISO-8601 calendar date.
    #[error("Invalid injury date '{value}': {message}")]
    InvalidInjuryDate {
        /// The rejected input.
        value: String,
        /// The parser's description of the problem.
        message: String,
    },

    /// A payslip carried a value the engine refuses to average.
    #[error("Invalid payslip '{payslip_id}' field '{field}': {message}")]
    InvalidPayslip {
        /// The ID of the offending payslip.
        payslip_id: String,
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Amounts that are each valid add up past the range of a Decimal.
    #[error("Amounts out of range: {message}")]
    AmountOutOfRange {
        /// Which combined amount overflowed.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
