//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//! 3. `CorsLayer` (permissive, the backend serves browser clients directly)
//! 4. Security gate (bearer token validation against the public allow-lists)

pub mod security;

pub use security::security_gate;
