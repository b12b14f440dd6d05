use serde::{Deserialize, Serialize};

/// `POST /api/settings/auth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUpdate {
    pub username: String,
    pub password: String,
}
