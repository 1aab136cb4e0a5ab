//! Customer classification.

use serde::{Deserialize, Serialize};

/// Whether a customer is a private individual or a business.
///
/// Persisted and sent over the wire as a numeric code (1 = individual,
/// 2 = business), matching the registration DTO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum CustomerKind {
    /// A private individual (CPF holder).
    Individual,
    /// A business (CNPJ holder).
    Business,
}

impl CustomerKind {
    /// Numeric code used in the database and in registration DTOs.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Individual => 1,
            Self::Business => 2,
        }
    }

    /// Convert a numeric code back into a kind.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Individual),
            2 => Some(Self::Business),
            _ => None,
        }
    }
}

impl From<CustomerKind> for i32 {
    fn from(kind: CustomerKind) -> Self {
        kind.code()
    }
}

impl TryFrom<i32> for CustomerKind {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown customer kind code {code}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for kind in [CustomerKind::Individual, CustomerKind::Business] {
            assert_eq!(CustomerKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(CustomerKind::from_code(0), None);
        assert_eq!(CustomerKind::from_code(3), None);
    }

    #[test]
    fn test_serde_numeric_code() {
        let json = serde_json::to_string(&CustomerKind::Business).unwrap();
        assert_eq!(json, "2");
        let back: CustomerKind = serde_json::from_str("1").unwrap();
        assert_eq!(back, CustomerKind::Individual);
    }
}
