//! Roles and the authorities they grant.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Manager,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse a stored role string. Unknown values are None; callers decide
    /// whether that is a validation failure or data corruption.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "USER" => Some(Role::User),
            "MANAGER" => Some(Role::Manager),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Authority strings granted to this role, role marker first.
    pub fn authorities(&self) -> Vec<&'static str> {
        match self {
            Role::User => vec!["ROLE_USER"],
            Role::Manager => vec![
                "ROLE_MANAGER",
                "management:read",
                "management:create",
                "management:update",
                "management:delete",
            ],
            Role::Admin => vec![
                "ROLE_ADMIN",
                "admin:read",
                "admin:create",
                "admin:update",
                "admin:delete",
                "management:read",
                "management:create",
                "management:update",
                "management:delete",
            ],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
