//! License tiers and their precedence order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The tier of an operator license.
///
/// Variants are declared in ascending rank, so the derived `Ord` is the
/// precedence order used during selection: a higher tier unlocks more
/// features and is preferred over a lower one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OperatorLicenseType {
    /// No license, or no license currently active.
    #[default]
    None,
    /// Free basic tier.
    Basic,
    /// Gold subscription.
    Gold,
    /// Platinum subscription.
    Platinum,
    /// Enterprise subscription.
    Enterprise,
    /// Enterprise trial.
    Trial,
}

impl OperatorLicenseType {
    /// All tiers in ascending rank.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Basic,
        Self::Gold,
        Self::Platinum,
        Self::Enterprise,
        Self::Trial,
    ];

    /// Returns the numeric rank of this tier. Higher means more features.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns the lowercase wire name of this tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
            Self::Enterprise => "enterprise",
            Self::Trial => "trial",
        }
    }
}

impl fmt::Display for OperatorLicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorLicenseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownLicenseType(s.to_string()))
    }
}
