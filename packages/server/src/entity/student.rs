use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning account; one profile per user.
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(belongs_to, from = "username", to = "username")]
    pub user: HasOne<super::user::Entity>,

    pub name: String,
    pub class: String,
    #[sea_orm(unique)]
    pub register_number: String,
    pub email: String,
    pub phone: String,
    /// Cached; refreshed whenever attendance is recorded for the student.
    pub attendance_percentage: f64,

    #[sea_orm(has_many)]
    pub attendance: HasMany<super::attendance::Entity>,

    #[sea_orm(has_many)]
    pub claims: HasMany<super::medical_claim::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
