use common::ApprovalStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A teacher's decision on one attendance record referenced by a claim.
///
/// `(claim_id, attendance_id)` is unique; see `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "claim_review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub claim_id: i32,
    #[sea_orm(belongs_to, from = "claim_id", to = "id")]
    pub claim: HasOne<super::medical_claim::Entity>,

    pub attendance_id: i32,
    #[sea_orm(belongs_to, from = "attendance_id", to = "id")]
    pub attendance: HasOne<super::attendance::Entity>,

    /// Username of the teacher the review is addressed to.
    pub teacher_id: String,
    pub status: ApprovalStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    pub created_at: DateTimeUtc,
    pub reviewed_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
