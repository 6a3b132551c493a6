pub mod attendance;
pub mod claim;
pub mod date_period;
pub mod filename;
pub mod hash;
pub mod jwt;
pub mod profile;
