use chrono::{DateTime, Utc};
use common::ApprovalStatus;
use serde::{Deserialize, Serialize};

use crate::entity::{claim_review, medical_claim, teacher};
use crate::error::AppError;
use crate::models::claim::ReviewResponse;
use crate::models::shared::{validate_max_text, validate_required_text};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTeacherRequest {
    #[schema(example = "Dr. Rao")]
    pub name: String,
}

pub fn validate_create_teacher_request(payload: &CreateTeacherRequest) -> Result<(), AppError> {
    validate_required_text("Name", &payload.name, 128)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeacherResponse {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<teacher::Model> for TeacherResponse {
    fn from(m: teacher::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            name: m.name,
            created_at: m.created_at,
        }
    }
}

/// A teacher's decision on one review of a claim.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReviewDecisionRequest {
    #[schema(example = 3)]
    pub review_id: i32,
    pub approved: bool,
    #[schema(example = "Certificate verified")]
    pub message: Option<String>,
}

pub fn validate_review_decision_request(payload: &ReviewDecisionRequest) -> Result<(), AppError> {
    if let Some(message) = &payload.message {
        validate_max_text("Message", message, 2000)?;
    }
    Ok(())
}

/// A review addressed to the caller, with a summary of its claim.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TeacherReviewResponse {
    pub review: ReviewResponse,
    pub student_id: i32,
    pub reason: String,
    pub description: String,
    /// Final IPM decision on the claim.
    pub claim_status: ApprovalStatus,
}

impl TeacherReviewResponse {
    pub fn new(review: claim_review::Model, claim: medical_claim::Model) -> Self {
        Self {
            review: ReviewResponse::from(review),
            student_id: claim.student_id,
            reason: claim.reason,
            description: claim.description,
            claim_status: claim.status,
        }
    }
}
