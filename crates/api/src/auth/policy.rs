//! Owner-or-admin authorization policy.
//!
//! One reusable predicate shared by every entity lookup, instead of
//! repeating the check inline per operation: the caller may touch a
//! resource iff they are authenticated and either hold `ADMIN` or own the
//! resource.

use mercado_core::{CustomerId, Role};

use crate::auth::Principal;
use crate::error::AppError;

/// Permit the operation iff `principal` is present and is an admin or the
/// owner of the resource.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the principal is absent, or is a
/// non-admin whose id differs from `owner`.
pub fn authorize_owner(
    principal: Option<&Principal>,
    owner: CustomerId,
) -> Result<(), AppError> {
    match principal {
        Some(p) if p.has_role(Role::Admin) || p.id == owner => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

/// Username-keyed variant of [`authorize_owner`], used by lookup-by-email.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the principal is absent, or is a
/// non-admin whose username differs from `owner_username`.
pub fn authorize_username(
    principal: Option<&Principal>,
    owner_username: &str,
) -> Result<(), AppError> {
    match principal {
        Some(p) if p.has_role(Role::Admin) || p.username == owner_username => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

/// Permit the operation only for admins.
///
/// # Errors
///
/// Returns `AppError::Forbidden` for absent or non-admin principals.
pub fn authorize_admin(principal: Option<&Principal>) -> Result<(), AppError> {
    match principal {
        Some(p) if p.has_role(Role::Admin) => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn principal(id: i32, roles: &[Role]) -> Principal {
        Principal {
            id: CustomerId::new(id),
            username: format!("user{id}@example.com"),
            roles: roles.iter().copied().collect::<HashSet<_>>(),
        }
    }

    #[test]
    fn test_absent_principal_denied() {
        assert!(authorize_owner(None, CustomerId::new(1)).is_err());
        assert!(authorize_username(None, "maria@gmail.com").is_err());
        assert!(authorize_admin(None).is_err());
    }

    #[test]
    fn test_owner_allowed_other_denied() {
        let p = principal(5, &[Role::Customer]);
        assert!(authorize_owner(Some(&p), CustomerId::new(5)).is_ok());
        assert!(authorize_owner(Some(&p), CustomerId::new(7)).is_err());
    }

    #[test]
    fn test_admin_allowed_on_any_resource() {
        let p = principal(1, &[Role::Admin, Role::Customer]);
        assert!(authorize_owner(Some(&p), CustomerId::new(99)).is_ok());
        assert!(authorize_username(Some(&p), "someone-else@example.com").is_ok());
        assert!(authorize_admin(Some(&p)).is_ok());
    }

    #[test]
    fn test_username_match() {
        let p = principal(5, &[Role::Customer]);
        assert!(authorize_username(Some(&p), "user5@example.com").is_ok());
        assert!(authorize_username(Some(&p), "user7@example.com").is_err());
    }

    #[test]
    fn test_non_admin_cannot_pass_admin_gate() {
        let p = principal(5, &[Role::Customer]);
        assert!(authorize_admin(Some(&p)).is_err());
    }
}
