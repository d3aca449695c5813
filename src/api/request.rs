//! Request types for the PIAWE engine API.
//!
//! This module defines the JSON request body for the `/piawe/calculate`
//! endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{PayslipEntry, PiaweAdjustment};

/// Request body for the `/piawe/calculate` endpoint.
///
/// The injury date and jurisdiction arrive as strings so that malformed
/// values are reported with the engine's own error codes rather than as a
/// generic JSON rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiaweRequest {
    /// The worker's pay history, in any order.
    pub payslips: Vec<PayslipEntry>,
    /// ISO-8601 injury date.
    pub injury_date: String,
    /// Jurisdiction code, e.g. `"NSW"`.
    pub jurisdiction: String,
    /// Adjustments to apply after capping, in order.
    #[serde(default)]
    pub adjustments: Vec<PiaweAdjustment>,
}
