//! Authentication and authorization extractors.
//!
//! - [`auth::Principal`] -- Resolves the bearer credential (service key or JWT).
//! - [`auth::AuthUser`] -- Requires a JWT-authenticated user.
//! - [`rbac::RequireAdmin`] -- Requires the service key or the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any valid credential.

pub mod auth;
pub mod rbac;
