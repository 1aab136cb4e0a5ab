//! Core types for Mercado.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod kind;
pub mod role;
pub mod tax_id;

pub use email::{Email, EmailError};
pub use id::*;
pub use kind::CustomerKind;
pub use role::Role;
pub use tax_id::{TaxId, TaxIdError};
