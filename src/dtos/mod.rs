pub mod auth_dtos;
pub mod dashboard_dtos;
pub mod nested_form;
