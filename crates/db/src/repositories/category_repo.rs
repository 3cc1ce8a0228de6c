//! Repository for the `categories` table.

use sqlx::PgPool;
use colorbook_core::types::DbId;

use crate::models::category::Category;

/// Column list for categories queries.
const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Read access to categories. Categories are managed outside this service.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Find a category by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by its unique slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
