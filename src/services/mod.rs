pub mod auth_services;
pub mod session_services;
pub mod upload_services;
