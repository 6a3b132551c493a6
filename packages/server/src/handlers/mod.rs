pub mod attendance;
pub mod auth;
pub mod claim;
pub mod ipm;
pub mod student;
pub mod teacher;
