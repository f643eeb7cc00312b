//! Newsletter draft repository implementation.

use sqlx::PgPool;

use newsroom_core::error::{AppError, ErrorKind};
use newsroom_core::result::AppResult;
use newsroom_entity::newsletter::NewsletterDraft;

/// Repository for newsletter drafts.
#[derive(Debug, Clone)]
pub struct NewsletterRepository {
    pool: PgPool,
}

impl NewsletterRepository {
    /// Create a new newsletter repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Most recently sent newsletters, newest first.
    pub async fn find_recent_sent(&self, limit: u32) -> AppResult<Vec<NewsletterDraft>> {
        sqlx::query_as::<_, NewsletterDraft>(
            "SELECT * FROM newsletter_drafts WHERE status = 'sent' \
             ORDER BY sent_at DESC NULLS LAST, created_at DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list sent newsletters", e)
        })
    }
}
