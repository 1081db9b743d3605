pub mod authentication;
pub mod health;
