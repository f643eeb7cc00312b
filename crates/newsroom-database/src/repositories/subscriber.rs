//! Subscriber repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use newsroom_core::error::{AppError, ErrorKind};
use newsroom_core::result::AppResult;
use newsroom_entity::subscriber::{RiskLevel, Subscriber};

use crate::store::{CountryEngagement, CountryGroup, RiskLevelCount, SegmentGroup};

/// Repository for subscriber reads and derived-column writes.
#[derive(Debug, Clone)]
pub struct SubscriberRepository {
    pool: PgPool,
}

impl SubscriberRepository {
    /// Create a new subscriber repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a subscriber by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscriber>> {
        sqlx::query_as::<_, Subscriber>("SELECT * FROM subscribers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find subscriber", e))
    }

    /// List the IDs of every active subscriber.
    pub async fn find_active_ids(&self) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM subscribers WHERE is_active = TRUE ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active subscribers", e)
        })
    }

    /// Count active subscribers.
    pub async fn count_active(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscribers WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count active subscribers", e)
            })
    }

    /// Overwrite the stored engagement score and risk level.
    pub async fn update_engagement(
        &self,
        id: Uuid,
        score: i32,
        risk_level: RiskLevel,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE subscribers SET engagement_score = $2, risk_level = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(score)
        .bind(risk_level)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update subscriber engagement", e)
        })?;
        Ok(())
    }

    /// Set the last engagement timestamp.
    pub async fn update_last_engaged(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE subscribers SET last_engaged_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last engagement", e)
            })?;
        Ok(())
    }

    /// Count active subscribers per stored risk level.
    pub async fn count_by_risk_level(&self) -> AppResult<Vec<RiskLevelCount>> {
        sqlx::query_as::<_, RiskLevelCount>(
            "SELECT risk_level, COUNT(*) AS subscribers FROM subscribers \
             WHERE is_active = TRUE GROUP BY risk_level ORDER BY risk_level NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count risk levels", e)
        })
    }

    /// Count subscribers created in `[start, end)`.
    pub async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subscribers WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count signups", e))
    }

    /// Count inactive subscribers whose row changed in `[start, end)`.
    pub async fn count_deactivated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subscribers \
             WHERE is_active = FALSE AND updated_at >= $1 AND updated_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count unsubscribes", e)
        })
    }

    /// Group active subscribers by country.
    pub async fn group_by_country(&self) -> AppResult<Vec<CountryGroup>> {
        sqlx::query_as::<_, CountryGroup>(
            "SELECT country, MAX(country_name) AS country_name, COUNT(*) AS subscribers \
             FROM subscribers WHERE is_active = TRUE AND country IS NOT NULL \
             GROUP BY country ORDER BY subscribers DESC, country",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to group subscribers by country", e)
        })
    }

    /// Send response for the active subscribers of one country.
    pub async fn country_engagement(
        &self,
        country: &str,
        since: DateTime<Utc>,
    ) -> AppResult<CountryEngagement> {
        sqlx::query_as::<_, CountryEngagement>(
            "SELECT \
                COUNT(ns.id) AS sends, \
                COUNT(ns.opened_at) AS opened, \
                (SELECT COUNT(DISTINCT c.subscriber_id) FROM clicks c \
                    JOIN subscribers cs ON cs.id = c.subscriber_id \
                    WHERE cs.is_active = TRUE AND cs.country = $1 AND c.clicked_at >= $2) \
                    AS unique_clickers \
             FROM newsletter_sends ns \
             JOIN subscribers s ON s.id = ns.subscriber_id \
             WHERE s.is_active = TRUE AND s.country = $1 AND ns.sent_at >= $2",
        )
        .bind(country)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute country engagement", e)
        })
    }

    /// Largest cities by active subscriber count.
    pub async fn group_by_city(&self, limit: u32) -> AppResult<Vec<SegmentGroup>> {
        sqlx::query_as::<_, SegmentGroup>(
            "SELECT city AS label, COUNT(*) AS subscribers, \
                AVG(engagement_score)::FLOAT8 AS avg_engagement \
             FROM subscribers WHERE is_active = TRUE AND city IS NOT NULL \
             GROUP BY city ORDER BY subscribers DESC, city LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to group subscribers by city", e)
        })
    }

    /// Group active subscribers by audience segment.
    pub async fn group_by_audience(&self) -> AppResult<Vec<SegmentGroup>> {
        self.group_by_column("audience").await
    }

    /// Group active subscribers by company size.
    pub async fn group_by_company_size(&self) -> AppResult<Vec<SegmentGroup>> {
        self.group_by_column("company_size").await
    }

    /// `column` must be one of the fixed segment column names above.
    async fn group_by_column(&self, column: &'static str) -> AppResult<Vec<SegmentGroup>> {
        let sql = format!(
            "SELECT {column} AS label, COUNT(*) AS subscribers, \
                AVG(engagement_score)::FLOAT8 AS avg_engagement \
             FROM subscribers WHERE is_active = TRUE AND {column} IS NOT NULL \
             GROUP BY {column} ORDER BY subscribers DESC, {column}"
        );

        sqlx::query_as::<_, SegmentGroup>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to group subscribers by {column}"),
                    e,
                )
            })
    }
}
