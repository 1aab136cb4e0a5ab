//! Access roles carried by an authenticated principal.

use serde::{Deserialize, Serialize};

/// A role granted to a customer account.
///
/// Every account holds `Customer`; staff accounts additionally hold
/// `Admin`, which bypasses the owner check on entity lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    /// Numeric code used in the database.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Admin => 1,
            Self::Customer => 2,
        }
    }

    /// Convert a numeric code back into a role.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Admin),
            2 => Some(Self::Customer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for role in [Role::Admin, Role::Customer] {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).ok().as_deref(), Some("\"ADMIN\""));
    }
}
