use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use common::Role;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{attendance, student};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::attendance::AttendanceResponse;
use crate::models::student::{
    CreateStudentRequest, StudentResponse, validate_create_student_request,
};
use crate::state::AppState;
use crate::utils::profile::find_student_by_username;

#[utoipa::path(
    post,
    path = "/create",
    tag = "Students",
    operation_id = "createStudent",
    summary = "Create the caller's student profile",
    description = "Binds a student profile to the authenticated account. Requires role `student`; each account has at most one profile.",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Profile created", body = StudentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Profile or register number exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %auth_user.username))]
pub async fn create_student(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(Role::Student)?;
    validate_create_student_request(&payload)?;

    let existing = student::Entity::find()
        .filter(
            Condition::any()
                .add(student::Column::Username.eq(&auth_user.username))
                .add(student::Column::RegisterNumber.eq(payload.register_number.trim())),
        )
        .one(&state.db)
        .await?;
    if let Some(existing) = existing {
        return Err(AppError::Conflict(if existing.username == auth_user.username {
            "Student profile already exists".into()
        } else {
            "Register number is already in use".into()
        }));
    }

    let model = student::ActiveModel {
        username: Set(auth_user.username.clone()),
        name: Set(payload.name.trim().to_string()),
        class: Set(payload.class.trim().to_string()),
        register_number: Set(payload.register_number.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        attendance_percentage: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Student profile already exists"))?;

    Ok((StatusCode::CREATED, Json(StudentResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/info",
    tag = "Students",
    operation_id = "getStudentInfo",
    summary = "Get the caller's student profile",
    responses(
        (status = 200, description = "Student profile", body = StudentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No profile yet (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(username = %auth_user.username))]
pub async fn student_info(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StudentResponse>, AppError> {
    auth_user.require_role(Role::Student)?;

    let student = find_student_by_username(&state.db, &auth_user.username).await?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    get,
    path = "/attendance",
    tag = "Students",
    operation_id = "listStudentAttendance",
    summary = "List the caller's attendance records",
    description = "Returns every attendance row of the caller, oldest date first.",
    responses(
        (status = 200, description = "Attendance records", body = Vec<AttendanceResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No profile yet (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(username = %auth_user.username))]
pub async fn list_attendance(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendanceResponse>>, AppError> {
    auth_user.require_role(Role::Student)?;

    let student = find_student_by_username(&state.db, &auth_user.username).await?;

    let rows = attendance::Entity::find()
        .filter(attendance::Column::StudentId.eq(student.id))
        .order_by_asc(attendance::Column::Date)
        .order_by_asc(attendance::Column::Period)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(AttendanceResponse::from).collect()))
}
