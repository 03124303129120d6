//! Persistence gateway for pitches.
//!
//! Every read and delete is scoped to an owner. Deletes check ownership
//! explicitly before issuing the owner-filtered DELETE, so a foreign id is
//! reported as `Forbidden` rather than silently ignored.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::pitch::{NewPitch, StoredPitch};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Pitch {0} not found")]
    NotFound(i64),

    #[error("Pitch {0} belongs to another user")]
    Forbidden(i64),
}

/// Create/read/delete over stored pitches. There is no update.
#[async_trait]
pub trait PitchStore: Send + Sync {
    async fn insert(&self, owner: Uuid, pitch: &NewPitch) -> Result<i64, PersistError>;

    /// Newest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<StoredPitch>, PersistError>;

    async fn get(&self, id: i64, owner: Uuid) -> Result<StoredPitch, PersistError>;

    async fn delete_by_id(&self, id: i64, owner: Uuid) -> Result<(), PersistError>;
}

/// `PitchStore` backed by the `pitches` table in PostgreSQL.
#[derive(Clone)]
pub struct PgPitchStore {
    pool: PgPool,
}

impl PgPitchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn owner_of(&self, id: i64) -> Result<Option<Uuid>, PersistError> {
        Ok(
            sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM pitches WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl PitchStore for PgPitchStore {
    async fn insert(&self, owner: Uuid, pitch: &NewPitch) -> Result<i64, PersistError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO pitches
                (user_id, title, short_description, industry, tone, language,
                 generated_data, landing_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(&pitch.title)
        .bind(&pitch.short_description)
        .bind(&pitch.industry)
        .bind(&pitch.tone)
        .bind(&pitch.language)
        .bind(&pitch.generated_data)
        .bind(&pitch.landing_code)
        .fetch_one(&self.pool)
        .await?;

        info!("Stored pitch {id} ('{}') for user {owner}", pitch.title);
        Ok(id)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<StoredPitch>, PersistError> {
        Ok(sqlx::query_as::<_, StoredPitch>(
            "SELECT * FROM pitches WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, id: i64, owner: Uuid) -> Result<StoredPitch, PersistError> {
        let row = sqlx::query_as::<_, StoredPitch>("SELECT * FROM pitches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PersistError::NotFound(id))?;

        if row.user_id != owner {
            warn!("User {owner} requested pitch {id} owned by someone else");
            return Err(PersistError::Forbidden(id));
        }
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64, owner: Uuid) -> Result<(), PersistError> {
        match self.owner_of(id).await? {
            None => return Err(PersistError::NotFound(id)),
            Some(actual) if actual != owner => {
                warn!("User {owner} tried to delete pitch {id} owned by someone else");
                return Err(PersistError::Forbidden(id));
            }
            Some(_) => {}
        }

        let result = sqlx::query("DELETE FROM pitches WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        // Deleted concurrently between the ownership check and the DELETE.
        if result.rows_affected() == 0 {
            return Err(PersistError::NotFound(id));
        }

        info!("Deleted pitch {id} for user {owner}");
        Ok(())
    }
}
