#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decision state shared by medical claims and their per-attendance reviews.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
pub enum ApprovalStatus {
    /// No decision has been made yet.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Pending"))]
    Pending,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Approved"))]
    Approved,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Rejected"))]
    Rejected,
}

impl ApprovalStatus {
    pub const ALL: &'static [ApprovalStatus] = &[Self::Pending, Self::Approved, Self::Rejected];

    /// Returns true once a decision has been recorded.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Map a reviewer's yes/no decision to a status.
    pub fn from_decision(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Rejected
        }
    }

    /// Fold the statuses of a claim's reviews into one outcome.
    ///
    /// Any `Pending` wins, then any `Rejected`; otherwise `Approved`.
    /// An empty set is vacuously `Approved`.
    pub fn aggregate<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ApprovalStatus>,
    {
        let mut rejected = false;
        for status in statuses {
            match status {
                Self::Pending => return Self::Pending,
                Self::Rejected => rejected = true,
                Self::Approved => {}
            }
        }
        if rejected {
            Self::Rejected
        } else {
            Self::Approved
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            ApprovalStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for ApprovalStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
