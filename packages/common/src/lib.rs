pub mod approval_status;
pub mod role;
pub mod storage;

pub use approval_status::ApprovalStatus;
pub use role::Role;
