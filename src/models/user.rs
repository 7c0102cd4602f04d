//! Modelo de User
//!
//! Este módulo contiene el struct User y el rol con el que opera
//! en el marketplace (propietario o arrendatario).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Roles del marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Renter,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Renter => "renter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(UserRole::Owner),
            "renter" => Some(UserRole::Renter),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role: role.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_str(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from_str("owner"), Some(UserRole::Owner));
        assert_eq!(UserRole::from_str("renter"), Some(UserRole::Renter));
        assert_eq!(UserRole::from_str("admin"), None);
        assert_eq!(UserRole::Owner.as_str(), "owner");
    }
}
