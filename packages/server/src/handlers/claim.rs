use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use common::storage::{BlobStore, ContentHash};
use common::{ApprovalStatus, Role};
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::entity::{attendance, claim_file, claim_review, medical_claim};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::claim::{
    ClaimResponse, CreateClaimRequest, MAX_CLAIM_FILES, validate_create_claim_request,
};
use crate::state::AppState;
use crate::utils::attendance::find_matching_attendance;
use crate::utils::claim::{find_claim, load_claim_aggregate, load_claim_aggregates};
use crate::utils::filename::content_disposition_value;
use crate::utils::profile::find_student_by_username;

/// Body limit for claim submission: every file at the blob size limit,
/// base64-inflated, plus room for the JSON envelope.
pub fn claim_body_limit(max_blob_size: u64) -> DefaultBodyLimit {
    let total = claim_body_limit_bytes(max_blob_size);
    DefaultBodyLimit::max(usize::try_from(total).unwrap_or(usize::MAX))
}

fn claim_body_limit_bytes(max_blob_size: u64) -> u64 {
    let per_file = max_blob_size.saturating_mul(4) / 3 + 4;
    per_file
        .saturating_mul(MAX_CLAIM_FILES as u64)
        .saturating_add(64 * 1024)
}

/// An evidence file already written to the blob store.
struct StoredFile {
    name: String,
    hash: ContentHash,
    content_type: Option<String>,
    size: i64,
}

#[utoipa::path(
    post,
    path = "/create",
    tag = "Claims",
    operation_id = "createClaim",
    summary = "Submit a medical claim",
    description = "Creates a claim for the caller's student profile. Each `data` entry (`YYYY-MM-DD_PERIOD`) \
        is matched against the caller's attendance; every match gets one pending review addressed to the \
        teacher who recorded it and is marked as applied. Entries without a match are ignored. \
        `files` are base64 contents paired by index with `filenames`. Requires role `student`.",
    request_body = CreateClaimRequest,
    responses(
        (status = 201, description = "Claim created", body = ClaimResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No student profile (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %auth_user.username, claim_id))]
pub async fn create_claim(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateClaimRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(Role::Student)?;
    let slots = validate_create_claim_request(&payload)?;

    let student = find_student_by_username(&state.db, &auth_user.username).await?;

    // Blobs are content addressed, so writing them before the transaction
    // can at worst leave an unreferenced blob behind.
    let mut stored = Vec::with_capacity(payload.files.len());
    for (content, name) in payload.files.iter().zip(&payload.filenames) {
        let name = name.trim().to_string();
        let bytes = STANDARD
            .decode(content.trim())
            .map_err(|_| AppError::Validation(format!("File '{name}' is not valid base64")))?;
        let hash = state.blob_store.put(&bytes).await?;
        let content_type = mime_guess::from_path(&name)
            .first()
            .map(|m| m.essence_str().to_string());
        stored.push(StoredFile {
            name,
            hash,
            content_type,
            size: bytes.len() as i64,
        });
    }

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let claim = medical_claim::ActiveModel {
        student_id: Set(student.id),
        reason: Set(payload.reason.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        status: Set(ApprovalStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    tracing::Span::current().record("claim_id", claim.id);

    for file in stored {
        claim_file::ActiveModel {
            claim_id: Set(claim.id),
            name: Set(file.name),
            path: Set(file.hash.to_hex()),
            content_type: Set(file.content_type),
            size: Set(file.size),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for slot in &slots {
        for row in find_matching_attendance(&txn, student.id, slot).await? {
            claim_review::ActiveModel {
                claim_id: Set(claim.id),
                attendance_id: Set(row.id),
                teacher_id: Set(row.teacher_id.clone()),
                status: Set(ApprovalStatus::Pending),
                message: Set(None),
                created_at: Set(now),
                reviewed_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "Attendance is referenced twice"))?;

            let mut active: attendance::ActiveModel = row.into();
            active.is_applied = Set(true);
            active.update(&txn).await?;
        }
    }

    let aggregate = load_claim_aggregate(&txn, claim).await?;
    txn.commit().await?;

    tracing::info!(
        reviews = aggregate.reviews.len(),
        files = aggregate.files.len(),
        "Claim submitted"
    );

    Ok((StatusCode::CREATED, Json(ClaimResponse::from(aggregate))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Claims",
    operation_id = "listMyClaims",
    summary = "List the caller's claims",
    description = "Returns the caller's claims with files and reviews, newest first. Requires role `student`.",
    responses(
        (status = 200, description = "Claims", body = Vec<ClaimResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No student profile (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(username = %auth_user.username))]
pub async fn list_my_claims(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClaimResponse>>, AppError> {
    auth_user.require_role(Role::Student)?;

    let student = find_student_by_username(&state.db, &auth_user.username).await?;

    let claims = medical_claim::Entity::find()
        .filter(medical_claim::Column::StudentId.eq(student.id))
        .order_by_desc(medical_claim::Column::CreatedAt)
        .order_by_desc(medical_claim::Column::Id)
        .all(&state.db)
        .await?;

    let aggregates = load_claim_aggregates(&state.db, claims).await?;
    Ok(Json(aggregates.into_iter().map(ClaimResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{claim_id}",
    tag = "Claims",
    operation_id = "getClaim",
    summary = "Get a claim by ID",
    description = "Returns the claim with its files and reviews. Any authenticated account may read it.",
    params(("claim_id" = i32, Path, description = "Claim ID")),
    responses(
        (status = 200, description = "Claim details", body = ClaimResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Claim not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_claim(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(claim_id): Path<i32>,
) -> Result<Json<ClaimResponse>, AppError> {
    let claim = find_claim(&state.db, claim_id).await?;
    let aggregate = load_claim_aggregate(&state.db, claim).await?;
    Ok(Json(aggregate.into()))
}

#[utoipa::path(
    get,
    path = "/{claim_id}/files/{file_id}",
    tag = "Claims",
    operation_id = "downloadClaimFile",
    summary = "Download an evidence file",
    description = "Streams the stored file. Supports ETag-based caching via If-None-Match.",
    params(
        ("claim_id" = i32, Path, description = "Claim ID"),
        ("file_id" = i32, Path, description = "File ID"),
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, headers))]
pub async fn download_claim_file(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path((claim_id, file_id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let file = claim_file::Entity::find_by_id(file_id)
        .filter(claim_file::Column::ClaimId.eq(claim_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    build_file_response(&file, &headers, &*state.blob_store).await
}

async fn build_file_response(
    file: &claim_file::Model,
    headers: &HeaderMap,
    blob_store: &dyn BlobStore,
) -> Result<Response, AppError> {
    let etag_value = format!("\"{}\"", file.path);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let hash = ContentHash::from_hex(&file.path)?;
    let reader = blob_store.open(&hash).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = file
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file.size.to_string())
        .header(header::CONTENT_DISPOSITION, content_disposition_value(&file.name))
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
