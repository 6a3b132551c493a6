use chrono::{DateTime, Utc};
use common::ApprovalStatus;
use serde::{Deserialize, Serialize};

use crate::entity::{claim_file, claim_review};
use crate::error::AppError;
use crate::models::shared::{validate_max_text, validate_required_text};
use crate::utils::claim::ClaimAggregate;
use crate::utils::date_period::{DatePeriod, parse_date_periods};
use crate::utils::filename::validate_flat_filename;

/// Maximum number of evidence files per claim.
pub const MAX_CLAIM_FILES: usize = 10;

/// Request body for submitting a medical claim.
///
/// `files[i]` is the standard-base64 content of the file named `filenames[i]`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateClaimRequest {
    #[schema(example = "Fever")]
    pub reason: String,
    #[serde(default)]
    #[schema(example = "Admitted to hospital for two days")]
    pub description: String,
    /// Missed slots as `YYYY-MM-DD_PERIOD`.
    #[serde(default)]
    #[schema(example = json!(["2024-01-10_P1", "2024-01-10_P2"]))]
    pub data: Vec<String>,
    #[serde(default)]
    #[schema(example = json!(["JVBERi0xLjQK"]))]
    pub files: Vec<String>,
    #[serde(default)]
    #[schema(example = json!(["certificate.pdf"]))]
    pub filenames: Vec<String>,
}

/// Validate a claim submission and return its de-duplicated slots.
pub fn validate_create_claim_request(
    payload: &CreateClaimRequest,
) -> Result<Vec<DatePeriod>, AppError> {
    validate_required_text("Reason", &payload.reason, 256)?;
    validate_max_text("Description", &payload.description, 4000)?;

    if payload.files.len() != payload.filenames.len() {
        return Err(AppError::Validation(format!(
            "Got {} files but {} filenames",
            payload.files.len(),
            payload.filenames.len()
        )));
    }
    if payload.files.len() > MAX_CLAIM_FILES {
        return Err(AppError::Validation(format!(
            "At most {MAX_CLAIM_FILES} files may be attached"
        )));
    }
    for name in &payload.filenames {
        validate_flat_filename(name).map_err(|e| AppError::Validation(e.message().into()))?;
    }

    parse_date_periods(&payload.data).map_err(|e| AppError::Validation(e.to_string()))
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ClaimFileResponse {
    pub id: i32,
    #[schema(example = "certificate.pdf")]
    pub name: String,
    #[schema(example = "application/pdf")]
    pub content_type: Option<String>,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<claim_file::Model> for ClaimFileResponse {
    fn from(m: claim_file::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            content_type: m.content_type,
            size: m.size,
            created_at: m.created_at,
        }
    }
}

/// One teacher's decision on one attendance slot of a claim.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub claim_id: i32,
    pub attendance_id: i32,
    #[schema(example = "T7")]
    pub teacher_id: String,
    pub status: ApprovalStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<claim_review::Model> for ReviewResponse {
    fn from(m: claim_review::Model) -> Self {
        Self {
            id: m.id,
            claim_id: m.claim_id,
            attendance_id: m.attendance_id,
            teacher_id: m.teacher_id,
            status: m.status,
            message: m.message,
            created_at: m.created_at,
            reviewed_at: m.reviewed_at,
        }
    }
}

/// A claim with its files and reviews.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ClaimResponse {
    pub id: i32,
    pub student_id: i32,
    pub reason: String,
    pub description: String,
    /// Final IPM decision.
    pub status: ApprovalStatus,
    /// Derived from the reviews: Pending if any is pending, else Rejected if
    /// any is rejected, else Approved.
    pub review_status: ApprovalStatus,
    pub files: Vec<ClaimFileResponse>,
    pub reviews: Vec<ReviewResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClaimAggregate> for ClaimResponse {
    fn from(agg: ClaimAggregate) -> Self {
        let review_status = agg.review_status();
        let ClaimAggregate {
            claim,
            files,
            reviews,
        } = agg;
        Self {
            id: claim.id,
            student_id: claim.student_id,
            reason: claim.reason,
            description: claim.description,
            status: claim.status,
            review_status,
            files: files.into_iter().map(ClaimFileResponse::from).collect(),
            reviews: reviews.into_iter().map(ReviewResponse::from).collect(),
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}
