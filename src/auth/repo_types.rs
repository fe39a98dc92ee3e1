use serde::{Deserialize, Serialize};

/// User record as held by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String, // unique identity key
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
}
