//! Content source repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use newsroom_core::error::{AppError, ErrorKind};
use newsroom_core::result::AppResult;
use newsroom_entity::content::Source;

/// Repository for content sources.
#[derive(Debug, Clone)]
pub struct SourceRepository {
    pool: PgPool,
}

impl SourceRepository {
    /// Create a new source repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a source by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Source>> {
        sqlx::query_as::<_, Source>("SELECT id, name FROM sources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find source", e))
    }
}
