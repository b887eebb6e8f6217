//! Court repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::store::CourtStore;
use crate::models::court::Court;
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct CourtRepository {
    pool: PgPool,
}

impl CourtRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourtStore for CourtRepository {
    async fn list(&self) -> Result<Vec<Court>> {
        let courts = sqlx::query_as::<_, Court>("SELECT id, name FROM courts ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(courts)
    }

    async fn find(&self, id: i32) -> Result<Option<Court>> {
        let court = sqlx::query_as::<_, Court>("SELECT id, name FROM courts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(court)
    }
}
