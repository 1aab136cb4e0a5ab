//! Mercado Core - Shared types library.
//!
//! This crate provides common domain types used across the Mercado backend:
//! type-safe entity IDs, validated email addresses and tax ids, and the
//! customer classification / role enums.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, tax ids and enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
