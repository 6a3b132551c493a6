use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Evidence attached to a claim. Immutable once created.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "claim_file")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub claim_id: i32,
    #[sea_orm(belongs_to, from = "claim_id", to = "id")]
    pub claim: HasOne<super::medical_claim::Entity>,

    /// Original upload filename.
    pub name: String,
    /// Hex content hash locating the bytes in the blob store.
    pub path: String,
    pub content_type: Option<String>,
    pub size: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
