pub mod json_file_repo;
pub mod profile_pg_repo;
pub mod profile_store;
