//! Access profile model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role granted to a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    Superadmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Superadmin => "superadmin",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "superadmin" => Role::Superadmin,
            _ => Role::Manager,
        }
    }
}

/// Raw profile row; assigned sites live in a join table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
}

/// Profile with its site assignments resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub site_ids: Vec<Uuid>,
}

impl Profile {
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }
}
