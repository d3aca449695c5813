//! Jurisdiction codes.
//!
//! This module defines the [`Jurisdiction`] enum covering the eight Australian
//! state and territory workers' compensation schemes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// An Australian workers' compensation jurisdiction.
///
/// Codes serialise as their upper-case abbreviation and parse
/// case-insensitively.
///
/// # Example
///
/// ```
/// use piawe_engine::models::Jurisdiction;
///
/// let jurisdiction: Jurisdiction = "vic".parse().unwrap();
/// assert_eq!(jurisdiction, Jurisdiction::Vic);
/// assert_eq!(jurisdiction.to_string(), "VIC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    /// New South Wales.
    Nsw,
    /// Victoria.
    Vic,
    /// Queensland.
    Qld,
    /// Western Australia.
    Wa,
    /// South Australia.
    Sa,
    /// Tasmania.
    Tas,
    /// Northern Territory.
    Nt,
    /// Australian Capital Territory.
    Act,
}

impl Jurisdiction {
    /// Every jurisdiction, in rule table order.
    pub const ALL: [Jurisdiction; 8] = [
        Jurisdiction::Nsw,
        Jurisdiction::Vic,
        Jurisdiction::Qld,
        Jurisdiction::Wa,
        Jurisdiction::Sa,
        Jurisdiction::Tas,
        Jurisdiction::Nt,
        Jurisdiction::Act,
    ];

    /// Returns the upper-case code (e.g. "NSW").
    pub fn code(self) -> &'static str {
        match self {
            Jurisdiction::Nsw => "NSW",
            Jurisdiction::Vic => "VIC",
            Jurisdiction::Qld => "QLD",
            Jurisdiction::Wa => "WA",
            Jurisdiction::Sa => "SA",
            Jurisdiction::Tas => "TAS",
            Jurisdiction::Nt => "NT",
            Jurisdiction::Act => "ACT",
        }
    }

    /// Position of this jurisdiction in [`Jurisdiction::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Jurisdiction::ALL
            .into_iter()
            .find(|j| j.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| EngineError::UnknownJurisdiction {
                code: s.to_string(),
            })
    }
}
