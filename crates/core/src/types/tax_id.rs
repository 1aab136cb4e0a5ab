//! Tax id (CPF or CNPJ) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TaxIdError {
    /// The input string is empty.
    #[error("tax id cannot be empty")]
    Empty,
    /// The input contains characters other than digits and the usual
    /// `.`, `-`, `/` separators.
    #[error("tax id may only contain digits and separators")]
    InvalidCharacter,
    /// The input has more digits than a CNPJ.
    #[error("tax id must have at most {max} digits")]
    TooLong {
        /// Maximum number of digits (CNPJ length).
        max: usize,
    },
}

/// A customer tax id - CPF for individuals, CNPJ for businesses.
///
/// Stored in digits-only form; formatting separators (`.`, `-`, `/`) are
/// stripped on parse. Check-digit verification is left to upstream intake
/// systems, so short test ids are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Number of digits in a CNPJ, the longest accepted form.
    pub const MAX_DIGITS: usize = 14;

    /// Parse a `TaxId` from a string, stripping separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits and separators, or has more than 14 digits.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        if s.is_empty() {
            return Err(TaxIdError::Empty);
        }

        let mut digits = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '.' | '-' | '/' => {}
                _ => return Err(TaxIdError::InvalidCharacter),
            }
        }

        if digits.is_empty() {
            return Err(TaxIdError::Empty);
        }

        if digits.len() > Self::MAX_DIGITS {
            return Err(TaxIdError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits-only tax id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for TaxId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TaxId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for TaxId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpf_with_separators() {
        let id = TaxId::parse("123.456.789-09").unwrap();
        assert_eq!(id.as_str(), "12345678909");
    }

    #[test]
    fn test_parse_cnpj_with_separators() {
        let id = TaxId::parse("12.345.678/0001-95").unwrap();
        assert_eq!(id.as_str(), "12345678000195");
    }

    #[test]
    fn test_parse_short_test_id() {
        // Check digits are not enforced, so fixture ids like "123" parse.
        assert_eq!(TaxId::parse("123").unwrap().as_str(), "123");
    }

    #[test]
    fn test_parse_rejects_letters() {
        assert!(matches!(
            TaxId::parse("12a45"),
            Err(TaxIdError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(TaxId::parse(""), Err(TaxIdError::Empty)));
        assert!(matches!(TaxId::parse("..-"), Err(TaxIdError::Empty)));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        assert!(matches!(
            TaxId::parse("123456789012345"),
            Err(TaxIdError::TooLong { .. })
        ));
    }
}
