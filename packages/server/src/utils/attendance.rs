use common::ApprovalStatus;
use sea_orm::prelude::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entity::{attendance, claim_review, student};
use crate::utils::date_period::DatePeriod;

/// Every attendance row of `student_id` in the given slot.
///
/// Usually zero or one row; the unique index on (student, date, period)
/// rules out more for data written by this service.
pub async fn find_matching_attendance<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
    slot: &DatePeriod,
) -> Result<Vec<attendance::Model>, DbErr> {
    attendance::Entity::find()
        .filter(attendance::Column::StudentId.eq(student_id))
        .filter(attendance::Column::Date.eq(slot.date))
        .filter(attendance::Column::Period.eq(slot.period.as_str()))
        .order_by_asc(attendance::Column::Id)
        .all(db)
        .await
}

/// Present share of `total` as a percentage; zero when nothing is recorded.
pub fn attendance_percentage(present: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    present as f64 / total as f64 * 100.0
}

/// Recompute and store the cached attendance percentage of a student.
pub async fn refresh_attendance_percentage<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
) -> Result<f64, DbErr> {
    let total = attendance::Entity::find()
        .filter(attendance::Column::StudentId.eq(student_id))
        .count(db)
        .await?;
    let present = attendance::Entity::find()
        .filter(attendance::Column::StudentId.eq(student_id))
        .filter(attendance::Column::IsPresent.eq(true))
        .count(db)
        .await?;

    let percentage = attendance_percentage(present, total);

    student::Entity::update_many()
        .col_expr(student::Column::AttendancePercentage, Expr::value(percentage))
        .filter(student::Column::Id.eq(student_id))
        .exec(db)
        .await?;

    Ok(percentage)
}

/// Set `is_claimed` on an attendance row from its reviews: claimed while
/// any review of any claim referencing it is approved.
pub async fn refresh_claimed_flag<C: ConnectionTrait>(
    db: &C,
    attendance_id: i32,
) -> Result<bool, DbErr> {
    let approved = claim_review::Entity::find()
        .filter(claim_review::Column::AttendanceId.eq(attendance_id))
        .filter(claim_review::Column::Status.eq(ApprovalStatus::Approved))
        .count(db)
        .await?;
    let claimed = approved > 0;

    attendance::Entity::update_many()
        .col_expr(attendance::Column::IsClaimed, Expr::value(claimed))
        .filter(attendance::Column::Id.eq(attendance_id))
        .exec(db)
        .await?;

    Ok(claimed)
}
