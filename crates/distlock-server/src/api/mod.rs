pub mod kv;
pub mod route;
pub mod session;
pub mod status;
