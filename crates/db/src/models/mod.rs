//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Create DTOs for inserts where the API or pipeline writes rows

pub mod ai_generation;
pub mod category;
pub mod coloring_page;
pub mod ledger;
pub mod social;
pub mod status;
