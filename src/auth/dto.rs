use serde::{Deserialize, Serialize};

/// Request body for registration and login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields, when present and non-empty.
    pub fn into_parts(self) -> Option<(String, String)> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub username: String,
}
