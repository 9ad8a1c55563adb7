pub mod auth_service;
pub mod identity;
pub mod upload;
