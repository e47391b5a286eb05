pub mod config;
pub mod constants;
pub mod lease;
pub mod response;
