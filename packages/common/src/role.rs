#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role tag carried by every account and embedded in issued tokens.
///
/// Authorization is an exact match on this tag; there is no hierarchy
/// between roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits medical claims and owns a student profile.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "student"))]
    Student,
    /// Reviews claims that reference attendance they recorded.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "teacher"))]
    Teacher,
    /// Records attendance and may act as IPM.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "admin"))]
    Admin,
    /// Institutional final approval of fully reviewed claims.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ipm"))]
    Ipm,
}

impl Role {
    pub const ALL: &'static [Role] = &[Self::Student, Self::Teacher, Self::Admin, Self::Ipm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
            Self::Ipm => "ipm",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown role tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    invalid: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid role '{}'. Valid values: {}",
            self.invalid,
            Role::ALL
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            "ipm" => Ok(Self::Ipm),
            _ => Err(ParseRoleError {
                invalid: s.to_string(),
            }),
        }
    }
}
