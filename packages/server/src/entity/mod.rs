pub mod attendance;
pub mod claim_file;
pub mod claim_review;
pub mod medical_claim;
pub mod student;
pub mod teacher;
pub mod user;
