use common::ApprovalStatus;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::shared::{validate_max_text, validate_required_text};

/// Partial update of a claim by the IPM. Absent fields are left unchanged.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateClaimRequest {
    pub status: Option<ApprovalStatus>,
    pub reason: Option<String>,
    pub description: Option<String>,
}

pub fn validate_update_claim_request(payload: &UpdateClaimRequest) -> Result<(), AppError> {
    if payload.status.is_none() && payload.reason.is_none() && payload.description.is_none() {
        return Err(AppError::Validation(
            "At least one of status, reason or description is required".into(),
        ));
    }
    if let Some(reason) = &payload.reason {
        validate_required_text("Reason", reason, 256)?;
    }
    if let Some(description) = &payload.description {
        validate_max_text("Description", description, 4000)?;
    }
    Ok(())
}
