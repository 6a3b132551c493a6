use common::ApprovalStatus;
use serde::Deserialize;

use crate::error::AppError;

/// Optional `?status=` filter used by the review and IPM listings.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Only return items in this status.
    pub status: Option<ApprovalStatus>,
}

/// Validate a required text field: trimmed, 1..=`max` Unicode characters.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Validate an optional free-text field: at most `max` Unicode characters.
pub fn validate_max_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
