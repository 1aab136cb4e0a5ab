//! Authentication and authorization.
//!
//! Every request carries its own proof of identity: the security gate
//! validates the `Authorization: Bearer` header, the token service turns a
//! token into a [`Principal`] (a pure function, no session state), and the
//! owner policy decides whether that principal may touch a given resource.
//!
//! # Modules
//!
//! - [`token`] - HS256 bearer token issuance and verification
//! - [`policy`] - The reusable owner-or-admin authorization predicate
//! - [`extract`] - Axum extractors for handlers that need the principal

pub mod extract;
pub mod policy;
pub mod token;

pub use extract::{CurrentPrincipal, OptionalPrincipal};
pub use policy::{authorize_admin, authorize_owner, authorize_username};
pub use token::{Principal, TokenError, TokenService};
