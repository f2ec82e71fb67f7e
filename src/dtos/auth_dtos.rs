use serde::Deserialize;

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginIn {
    #[serde(default)]
    pub password: String,
}
