//! Authentication primitives.
//!
//! - [`jwt`] -- validation of access tokens minted by the account service.

pub mod jwt;
