use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use common::Role;
use sea_orm::*;
use tracing::instrument;

use crate::entity::medical_claim;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::claim::ClaimResponse;
use crate::models::ipm::{UpdateClaimRequest, validate_update_claim_request};
use crate::models::shared::StatusQuery;
use crate::state::AppState;
use crate::utils::claim::{
    find_claim, has_pending_reviews, load_claim_aggregate, load_claim_aggregates,
    no_pending_reviews,
};

/// Roles allowed to act as the institutional approver.
const IPM_ROLES: &[Role] = &[Role::Ipm, Role::Admin];

#[utoipa::path(
    get,
    path = "/claims",
    tag = "IPM",
    operation_id = "listIpmClaims",
    summary = "List claims ready for final approval",
    description = "Returns claims none of whose reviews is still pending, oldest first. \
        `?status=` narrows on the claim's own (final) status. Requires role `ipm` or `admin`.",
    params(StatusQuery),
    responses(
        (status = 200, description = "Claims", body = Vec<ClaimResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(username = %auth_user.username))]
pub async fn list_claims(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<ClaimResponse>>, AppError> {
    auth_user.require_any_role(IPM_ROLES)?;

    let mut select = medical_claim::Entity::find().filter(no_pending_reviews());
    if let Some(status) = query.status {
        select = select.filter(medical_claim::Column::Status.eq(status));
    }

    let claims = select
        .order_by_asc(medical_claim::Column::CreatedAt)
        .order_by_asc(medical_claim::Column::Id)
        .all(&state.db)
        .await?;

    let aggregates = load_claim_aggregates(&state.db, claims).await?;
    Ok(Json(aggregates.into_iter().map(ClaimResponse::from).collect()))
}

#[utoipa::path(
    put,
    path = "/claims/{claim_id}",
    tag = "IPM",
    operation_id = "updateIpmClaim",
    summary = "Finalize or amend a claim",
    description = "Partially updates a claim. Setting `status` to Approved or Rejected is refused while any \
        review is still pending. Requires role `ipm` or `admin`.",
    params(("claim_id" = i32, Path, description = "Claim ID")),
    request_body = UpdateClaimRequest,
    responses(
        (status = 200, description = "Updated claim", body = ClaimResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Claim not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Reviews still pending (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %auth_user.username))]
pub async fn update_claim(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(claim_id): Path<i32>,
    AppJson(payload): AppJson<UpdateClaimRequest>,
) -> Result<Json<ClaimResponse>, AppError> {
    auth_user.require_any_role(IPM_ROLES)?;
    validate_update_claim_request(&payload)?;

    let txn = state.db.begin().await?;
    let existing = find_claim(&txn, claim_id).await?;

    if let Some(status) = payload.status
        && status.is_decided()
        && has_pending_reviews(&txn, existing.id).await?
    {
        return Err(AppError::Conflict(
            "Claim still has pending teacher reviews".into(),
        ));
    }

    let mut active: medical_claim::ActiveModel = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(ref reason) = payload.reason {
        active.reason = Set(reason.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    active.updated_at = Set(Utc::now());

    let claim = active.update(&txn).await?;
    let aggregate = load_claim_aggregate(&txn, claim).await?;
    txn.commit().await?;

    tracing::info!(status = %aggregate.claim.status, "Claim updated by IPM");

    Ok(Json(aggregate.into()))
}
