//! Domain logic for the colorbook backend.
//!
//! Everything in this crate is pure: no database, network or filesystem
//! access. The pipeline, social and API crates call into these functions so
//! the rules they encode can be unit-tested in isolation.

pub mod api_keys;
pub mod autopost;
pub mod billing;
pub mod data_uri;
pub mod difficulty;
pub mod error;
pub mod naming;
pub mod outline;
pub mod roles;
pub mod series;
pub mod types;
