use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One presence record for a student in one period of one day.
///
/// `(student_id, date, period)` is unique; see `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub student_id: i32,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,

    pub course: String,
    pub period: String,
    pub date: Date,
    /// Username of the teacher who recorded the attendance.
    pub teacher_id: String,

    pub is_present: bool,
    /// A claim referencing this record has been submitted.
    pub is_applied: bool,
    /// The referenced teacher approved the claim for this record.
    pub is_claimed: bool,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
