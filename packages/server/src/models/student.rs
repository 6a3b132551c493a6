use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::student;
use crate::error::AppError;
use crate::models::shared::validate_required_text;

/// Request body for creating the caller's student profile.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateStudentRequest {
    #[schema(example = "Alice Wonder")]
    pub name: String,
    #[schema(example = "CSE-A")]
    pub class: String,
    /// Institution-wide unique register number.
    #[schema(example = "21CS042")]
    pub register_number: String,
    #[schema(example = "alice@example.edu")]
    pub email: String,
    #[schema(example = "+91 98765 43210")]
    pub phone: String,
}

pub fn validate_create_student_request(payload: &CreateStudentRequest) -> Result<(), AppError> {
    validate_required_text("Name", &payload.name, 128)?;
    validate_required_text("Class", &payload.class, 64)?;
    validate_required_text("Register number", &payload.register_number, 64)?;
    validate_required_text("Email", &payload.email, 254)?;
    let email = payload.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => return Err(AppError::Validation("Email address is invalid".into())),
    }
    validate_required_text("Phone", &payload.phone, 32)?;
    if !payload
        .phone
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(AppError::Validation(
            "Phone may only contain digits, spaces and + - ( )".into(),
        ));
    }
    Ok(())
}

/// A student profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub class: String,
    pub register_number: String,
    pub email: String,
    pub phone: String,
    /// Share of recorded periods attended, 0-100.
    #[schema(example = 87.5)]
    pub attendance_percentage: f64,
    pub created_at: DateTime<Utc>,
}

impl From<student::Model> for StudentResponse {
    fn from(m: student::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            name: m.name,
            class: m.class,
            register_number: m.register_number,
            email: m.email,
            phone: m.phone,
            attendance_percentage: m.attendance_percentage,
            created_at: m.created_at,
        }
    }
}
