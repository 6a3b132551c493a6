use std::collections::HashMap;

use common::ApprovalStatus;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::{claim_file, claim_review, medical_claim};
use crate::error::AppError;

/// A claim together with everything it owns.
#[derive(Debug, Clone)]
pub struct ClaimAggregate {
    pub claim: medical_claim::Model,
    pub files: Vec<claim_file::Model>,
    pub reviews: Vec<claim_review::Model>,
}

impl ClaimAggregate {
    /// Outcome of the teacher reviews so far. Independent of `claim.status`.
    pub fn review_status(&self) -> ApprovalStatus {
        ApprovalStatus::aggregate(self.reviews.iter().map(|r| r.status))
    }
}

/// Look up a claim by ID, returning 404 if not found.
pub async fn find_claim<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<medical_claim::Model, AppError> {
    medical_claim::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Claim not found".into()))
}

pub async fn load_claim_aggregate<C: ConnectionTrait>(
    db: &C,
    claim: medical_claim::Model,
) -> Result<ClaimAggregate, DbErr> {
    let files = claim_file::Entity::find()
        .filter(claim_file::Column::ClaimId.eq(claim.id))
        .order_by_asc(claim_file::Column::Id)
        .all(db)
        .await?;
    let reviews = claim_review::Entity::find()
        .filter(claim_review::Column::ClaimId.eq(claim.id))
        .order_by_asc(claim_review::Column::Id)
        .all(db)
        .await?;

    Ok(ClaimAggregate {
        claim,
        files,
        reviews,
    })
}

/// Load files and reviews for many claims with one query per child table.
/// Output order follows `claims`.
pub async fn load_claim_aggregates<C: ConnectionTrait>(
    db: &C,
    claims: Vec<medical_claim::Model>,
) -> Result<Vec<ClaimAggregate>, DbErr> {
    if claims.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = claims.iter().map(|c| c.id).collect();

    let mut files_by_claim: HashMap<i32, Vec<claim_file::Model>> = HashMap::new();
    for file in claim_file::Entity::find()
        .filter(claim_file::Column::ClaimId.is_in(ids.clone()))
        .order_by_asc(claim_file::Column::Id)
        .all(db)
        .await?
    {
        files_by_claim.entry(file.claim_id).or_default().push(file);
    }

    let mut reviews_by_claim: HashMap<i32, Vec<claim_review::Model>> = HashMap::new();
    for review in claim_review::Entity::find()
        .filter(claim_review::Column::ClaimId.is_in(ids))
        .order_by_asc(claim_review::Column::Id)
        .all(db)
        .await?
    {
        reviews_by_claim
            .entry(review.claim_id)
            .or_default()
            .push(review);
    }

    Ok(claims
        .into_iter()
        .map(|claim| ClaimAggregate {
            files: files_by_claim.remove(&claim.id).unwrap_or_default(),
            reviews: reviews_by_claim.remove(&claim.id).unwrap_or_default(),
            claim,
        })
        .collect())
}

/// Claims none of whose reviews is still pending:
/// `id NOT IN (SELECT claim_id FROM claim_review WHERE status = 'Pending')`.
pub fn no_pending_reviews() -> Condition {
    Condition::all().add(
        medical_claim::Column::Id.not_in_subquery(
            SeaQuery::select()
                .column(claim_review::Column::ClaimId)
                .from(claim_review::Entity)
                .and_where(claim_review::Column::Status.eq(ApprovalStatus::Pending))
                .to_owned(),
        ),
    )
}

pub async fn has_pending_reviews<C: ConnectionTrait>(db: &C, claim_id: i32) -> Result<bool, DbErr> {
    let pending = claim_review::Entity::find()
        .filter(claim_review::Column::ClaimId.eq(claim_id))
        .filter(claim_review::Column::Status.eq(ApprovalStatus::Pending))
        .one(db)
        .await?;
    Ok(pending.is_some())
}
