//! Repository for the `coloring_pages` table.

use sqlx::PgPool;
use uuid::Uuid;
use colorbook_core::types::{DbId, Timestamp};

use crate::models::coloring_page::{ColoringPage, CreateSeriesPage, PageCandidate};
use crate::models::status::SocialPostStatus;

/// Column list for coloring_pages queries.
const COLUMNS: &str = "id, category_id, title, description, image_url, difficulty, \
    series_id, series_order, is_published, created_at, updated_at";

/// Columns selected for auto-post candidates (pages joined with categories).
const CANDIDATE_COLUMNS: &str =
    "p.id, p.title, p.description, p.image_url, c.name AS category_name";

/// Provides page inserts for published series and candidate queries for
/// the auto-poster.
pub struct ColoringPageRepo;

impl ColoringPageRepo {
    /// Insert every page of a series in one transaction, sharing `series_id`.
    ///
    /// Returns the created rows ordered by `series_order`.
    pub async fn create_series(
        pool: &PgPool,
        category_id: DbId,
        difficulty: &str,
        series_id: Uuid,
        pages: &[CreateSeriesPage],
    ) -> Result<Vec<ColoringPage>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO coloring_pages
                (category_id, title, description, image_url, difficulty, series_id, series_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(pages.len());
        for page in pages {
            let row = sqlx::query_as::<_, ColoringPage>(&query)
                .bind(category_id)
                .bind(&page.title)
                .bind(&page.description)
                .bind(&page.image_url)
                .bind(difficulty)
                .bind(series_id)
                .bind(page.series_order)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        tx.commit().await?;
        created.sort_by_key(|p| p.series_order);
        Ok(created)
    }

    /// List the pages of one series in reading order.
    pub async fn list_by_series(
        pool: &PgPool,
        series_id: Uuid,
    ) -> Result<Vec<ColoringPage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coloring_pages
             WHERE series_id = $1
             ORDER BY series_order ASC"
        );
        sqlx::query_as::<_, ColoringPage>(&query)
            .bind(series_id)
            .fetch_all(pool)
            .await
    }

    /// Published pages the user has not successfully posted since `cutoff`.
    pub async fn list_candidates_not_posted_since(
        pool: &PgPool,
        user_id: DbId,
        cutoff: Timestamp,
        limit: i64,
    ) -> Result<Vec<PageCandidate>, sqlx::Error> {
        let query = format!(
            "SELECT {CANDIDATE_COLUMNS}
             FROM coloring_pages p
             JOIN categories c ON c.id = p.category_id
             WHERE p.is_published = true
               AND NOT EXISTS (
                   SELECT 1 FROM social_posts sp
                   WHERE sp.coloring_page_id = p.id
                     AND sp.user_id = $1
                     AND sp.status_id = $3
                     AND sp.created_at >= $2
               )
             ORDER BY p.created_at DESC
             LIMIT $4"
        );
        sqlx::query_as::<_, PageCandidate>(&query)
            .bind(user_id)
            .bind(cutoff)
            .bind(SocialPostStatus::Posted.id())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Published pages without any recent-post filter.
    pub async fn list_candidates(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<PageCandidate>, sqlx::Error> {
        let query = format!(
            "SELECT {CANDIDATE_COLUMNS}
             FROM coloring_pages p
             JOIN categories c ON c.id = p.category_id
             WHERE p.is_published = true
             ORDER BY p.created_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, PageCandidate>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
