use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{attendance, claim_review};

/// Ensure the composite uniqueness indexes exist.
///
/// SeaORM's schema-sync only knows single-column uniqueness, so the
/// composite keys are created manually on startup. The generated SQL is
/// accepted by both PostgreSQL and SQLite.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // One attendance row per student and slot.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("uq_attendance_student_date_period")
        .table(attendance::Entity)
        .col(attendance::Column::StudentId)
        .col(attendance::Column::Date)
        .col(attendance::Column::Period)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index uq_attendance_student_date_period exists");

    // One review per claim and attendance row.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("uq_claim_review_claim_attendance")
        .table(claim_review::Entity)
        .col(claim_review::Column::ClaimId)
        .col(claim_review::Column::AttendanceId)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index uq_claim_review_claim_attendance exists");

    // Lookup of a teacher's inbox.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_claim_review_teacher_status")
        .table(claim_review::Entity)
        .col(claim_review::Column::TeacherId)
        .col(claim_review::Column::Status)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_claim_review_teacher_status exists");

    Ok(())
}
