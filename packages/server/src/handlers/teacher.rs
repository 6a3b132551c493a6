use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use common::{ApprovalStatus, Role};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{claim_review, medical_claim, teacher};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::claim::ReviewResponse;
use crate::models::shared::StatusQuery;
use crate::models::teacher::{
    CreateTeacherRequest, ReviewDecisionRequest, TeacherResponse, TeacherReviewResponse,
    validate_create_teacher_request, validate_review_decision_request,
};
use crate::state::AppState;
use crate::utils::attendance::refresh_claimed_flag;
use crate::utils::claim::find_claim;
use crate::utils::profile::find_teacher_by_username;

#[utoipa::path(
    post,
    path = "/create",
    tag = "Teachers",
    operation_id = "createTeacher",
    summary = "Create the caller's teacher profile",
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Profile created", body = TeacherResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Profile already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %auth_user.username))]
pub async fn create_teacher(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTeacherRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(Role::Teacher)?;
    validate_create_teacher_request(&payload)?;

    let model = teacher::ActiveModel {
        username: Set(auth_user.username.clone()),
        name: Set(payload.name.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Teacher profile already exists"))?;

    Ok((StatusCode::CREATED, Json(TeacherResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/self",
    tag = "Teachers",
    operation_id = "getTeacherSelf",
    summary = "Get the caller's teacher profile",
    responses(
        (status = 200, description = "Teacher profile", body = TeacherResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No profile yet (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(username = %auth_user.username))]
pub async fn teacher_self(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<TeacherResponse>, AppError> {
    auth_user.require_role(Role::Teacher)?;

    let teacher = find_teacher_by_username(&state.db, &auth_user.username).await?;
    Ok(Json(teacher.into()))
}

#[utoipa::path(
    get,
    path = "/claims",
    tag = "Teachers",
    operation_id = "listTeacherReviews",
    summary = "List reviews addressed to the caller",
    description = "Returns the caller's claim reviews, newest first, each with a summary of its claim. \
        Filter by review status with `?status=Pending|Approved|Rejected`.",
    params(StatusQuery),
    responses(
        (status = 200, description = "Reviews", body = Vec<TeacherReviewResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(username = %auth_user.username))]
pub async fn list_reviews(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<TeacherReviewResponse>>, AppError> {
    auth_user.require_role(Role::Teacher)?;

    let mut select =
        claim_review::Entity::find().filter(claim_review::Column::TeacherId.eq(&auth_user.username));
    if let Some(status) = query.status {
        select = select.filter(claim_review::Column::Status.eq(status));
    }

    let rows = select
        .order_by_desc(claim_review::Column::Id)
        .find_also_related(medical_claim::Entity)
        .all(&state.db)
        .await?;

    let reviews = rows
        .into_iter()
        .filter_map(|(review, claim)| claim.map(|c| TeacherReviewResponse::new(review, c)))
        .collect();

    Ok(Json(reviews))
}

#[utoipa::path(
    put,
    path = "/claims/{claim_id}",
    tag = "Teachers",
    operation_id = "reviewClaim",
    summary = "Approve or reject a review",
    description = "Records the caller's decision on one review of the claim. The referenced attendance \
        record is marked `is_claimed` while any review of it, from any claim, is approved. The claim's own \
        status is not changed. The review must belong to the claim and be addressed to the caller.",
    params(("claim_id" = i32, Path, description = "Claim ID")),
    request_body = ReviewDecisionRequest,
    responses(
        (status = 200, description = "Updated review", body = ReviewResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Claim or review not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Claim already finalized (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, payload),
    fields(username = %auth_user.username, review_id = payload.review_id)
)]
pub async fn review_claim(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(claim_id): Path<i32>,
    AppJson(payload): AppJson<ReviewDecisionRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    auth_user.require_role(Role::Teacher)?;
    validate_review_decision_request(&payload)?;

    let txn = state.db.begin().await?;
    let claim = find_claim(&txn, claim_id).await?;

    let review = claim_review::Entity::find_by_id(payload.review_id)
        .filter(claim_review::Column::ClaimId.eq(claim.id))
        .filter(claim_review::Column::TeacherId.eq(&auth_user.username))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

    if claim.status.is_decided() {
        return Err(AppError::Conflict("Claim has already been finalized".into()));
    }

    let now = Utc::now();
    let attendance_id = review.attendance_id;

    let mut active: claim_review::ActiveModel = review.into();
    active.status = Set(ApprovalStatus::from_decision(payload.approved));
    active.message = Set(payload
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty()));
    active.reviewed_at = Set(Some(now));
    let review = active.update(&txn).await?;

    refresh_claimed_flag(&txn, attendance_id).await?;

    let mut claim: medical_claim::ActiveModel = claim.into();
    claim.updated_at = Set(now);
    claim.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(status = %review.status, "Review recorded");

    Ok(Json(review.into()))
}
