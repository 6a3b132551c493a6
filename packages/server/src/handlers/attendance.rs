use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use common::Role;
use sea_orm::*;
use tracing::instrument;

use crate::entity::attendance;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::attendance::{
    AttendanceResponse, CreateAttendanceRequest, validate_create_attendance_request,
};
use crate::state::AppState;
use crate::utils::attendance::refresh_attendance_percentage;
use crate::utils::profile::find_student;

#[utoipa::path(
    post,
    path = "/create",
    tag = "Attendance",
    operation_id = "createAttendance",
    summary = "Record attendance for one slot",
    description = "Records a student's presence for one (date, period) and refreshes the student's cached attendance percentage. Requires role `admin`.",
    request_body = CreateAttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Slot already recorded (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, payload),
    fields(student_id = payload.student_id, date = %payload.date, period = %payload.period)
)]
pub async fn create_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(Role::Admin)?;
    validate_create_attendance_request(&payload)?;

    let txn = state.db.begin().await?;
    let student = find_student(&txn, payload.student_id).await?;

    let model = attendance::ActiveModel {
        student_id: Set(student.id),
        course: Set(payload.course.trim().to_string()),
        period: Set(payload.period.trim().to_string()),
        date: Set(payload.date),
        teacher_id: Set(payload.teacher_id.trim().to_string()),
        is_present: Set(payload.is_present),
        is_applied: Set(false),
        is_claimed: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(
            e,
            "Attendance for this student, date and period is already recorded",
        )
    })?;

    let percentage = refresh_attendance_percentage(&txn, student.id).await?;
    txn.commit().await?;

    tracing::debug!(attendance_id = model.id, percentage, "Attendance recorded");

    Ok((StatusCode::CREATED, Json(AttendanceResponse::from(model))))
}
