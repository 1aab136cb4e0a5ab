//! Business logic between the HTTP surface and the repositories.
//!
//! Services own authorization decisions and error translation; handlers
//! stay thin and repositories stay dumb.

pub mod auth;
pub mod catalog;
pub mod customers;
pub mod fixtures;
pub mod images;
pub mod mailer;
pub mod orders;
pub mod storage;

use crate::db::RepositoryError;
use crate::error::AppError;

/// Attach entity context to a repository-level miss; pass everything else
/// through the standard conversion.
pub(crate) fn not_found_as(err: RepositoryError, entity: &'static str, id: String) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound { entity, id },
        other => other.into(),
    }
}

/// Map a wire sort key (Portuguese field name) to its column.
///
/// Unknown keys pass through unchanged and fall to the repository's
/// sortable whitelist.
pub(crate) fn sort_column(wire: &str) -> &str {
    match wire {
        "nome" => "name",
        "preco" => "price",
        "instante" => "placed_at",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::sort_column;

    #[test]
    fn test_sort_column_translation() {
        assert_eq!(sort_column("nome"), "name");
        assert_eq!(sort_column("instante"), "placed_at");
        assert_eq!(sort_column("email"), "email");
    }
}
