pub mod auth;
pub mod id;
pub mod password_reset;
pub mod user;
