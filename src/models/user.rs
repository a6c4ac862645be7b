//! User model for storage and sessions.

use serde::{Deserialize, Serialize};

/// Authenticated identity stored in the `user` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Identity provider subject claim (primary key)
    pub id: String,
    /// Display name (given name from the identity provider)
    pub name: String,
    /// Contact address
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}
