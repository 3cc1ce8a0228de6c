//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must run inside a
//! caller-owned transaction take `&mut PgConnection` instead.

pub mod ai_generation_repo;
pub mod category_repo;
pub mod coloring_page_repo;
pub mod ledger_repo;
pub mod social_connection_repo;
pub mod social_post_repo;

pub use ai_generation_repo::AiGenerationRepo;
pub use category_repo::CategoryRepo;
pub use coloring_page_repo::ColoringPageRepo;
pub use ledger_repo::LedgerRepo;
pub use social_connection_repo::SocialConnectionRepo;
pub use social_post_repo::SocialPostRepo;
