pub mod auth;
pub mod shift;
