use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::attendance;
use crate::error::AppError;
use crate::models::shared::validate_required_text;

/// Request body for recording one attendance slot.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateAttendanceRequest {
    #[schema(example = 1)]
    pub student_id: i32,
    #[schema(example = "Operating Systems")]
    pub course: String,
    #[schema(example = "P1")]
    pub period: String,
    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub date: NaiveDate,
    /// Username of the teacher who took the attendance.
    #[schema(example = "T7")]
    pub teacher_id: String,
    pub is_present: bool,
}

pub fn validate_create_attendance_request(
    payload: &CreateAttendanceRequest,
) -> Result<(), AppError> {
    validate_required_text("Course", &payload.course, 128)?;
    validate_required_text("Period", &payload.period, 32)?;
    validate_required_text("Teacher ID", &payload.teacher_id, 32)?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AttendanceResponse {
    pub id: i32,
    pub student_id: i32,
    pub course: String,
    pub period: String,
    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub date: NaiveDate,
    pub teacher_id: String,
    pub is_present: bool,
    /// A claim referencing this slot has been submitted.
    pub is_applied: bool,
    /// The recording teacher approved the claim for this slot.
    pub is_claimed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<attendance::Model> for AttendanceResponse {
    fn from(m: attendance::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            course: m.course,
            period: m.period,
            date: m.date,
            teacher_id: m.teacher_id,
            is_present: m.is_present,
            is_applied: m.is_applied,
            is_claimed: m.is_claimed,
            created_at: m.created_at,
        }
    }
}
