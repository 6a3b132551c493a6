use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entity::{student, teacher};
use crate::error::AppError;

/// Look up the student profile owned by `username`, returning 404 if there is none.
pub async fn find_student_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<student::Model, AppError> {
    student::Entity::find()
        .filter(student::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student profile not found".into()))
}

pub async fn find_student<C: ConnectionTrait>(db: &C, id: i32) -> Result<student::Model, AppError> {
    student::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".into()))
}

/// Look up the teacher profile owned by `username`, returning 404 if there is none.
pub async fn find_teacher_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<teacher::Model, AppError> {
    teacher::Entity::find()
        .filter(teacher::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Teacher profile not found".into()))
}
