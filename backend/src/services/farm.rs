//! Farm ownership checks

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Resolves whether a farm belongs to a user
#[async_trait]
pub trait FarmDirectory: Send + Sync {
    /// `false` for unknown farms as well as foreign ones
    async fn is_owned_by(&self, farm_id: Uuid, user_id: Uuid) -> AppResult<bool>;
}

/// Farm directory backed by the `farms` table
#[derive(Clone)]
pub struct PgFarmDirectory {
    db: PgPool,
}

impl PgFarmDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FarmDirectory for PgFarmDirectory {
    async fn is_owned_by(&self, farm_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM farms WHERE id = $1 AND owner_id = $2)",
        )
        .bind(farm_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(owned)
    }
}
