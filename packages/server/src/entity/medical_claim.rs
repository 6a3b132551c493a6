use common::ApprovalStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medical_claim")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub student_id: i32,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,

    pub reason: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Final IPM decision. Never derived from the reviews.
    pub status: ApprovalStatus,

    #[sea_orm(has_many)]
    pub reviews: HasMany<super::claim_review::Entity>,

    #[sea_orm(has_many)]
    pub files: HasMany<super::claim_file::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
