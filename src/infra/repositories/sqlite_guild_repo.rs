use crate::domain::{
    models::{guild::Guild, user::Role},
    ports::GuildRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteGuildRepo {
    pool: SqlitePool,
}

impl SqliteGuildRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildRepository for SqliteGuildRepo {
    async fn create_with_leader(
        &self,
        guild: &Guild,
        leader_id: &str,
        leader_role: Role,
    ) -> Result<Guild, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Guild>(
            "INSERT INTO guilds (id, name, description, created_by, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id, name, description, created_by, created_at",
        )
            .bind(&guild.id)
            .bind(&guild.name)
            .bind(&guild.description)
            .bind(&guild.created_by)
            .bind(guild.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        // Guard re-checks membership at commit time; a concurrent join or
        // create rolls this back.
        let result = sqlx::query(
            "UPDATE users SET guild_id = ?, role = ?, updated_at = ? WHERE id = ? AND guild_id IS NULL",
        )
            .bind(&created.id)
            .bind(leader_role.as_str())
            .bind(Utc::now())
            .bind(leader_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() != 1 {
            return Err(AppError::Conflict("User is already in a guild".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Guild>, AppError> {
        sqlx::query_as::<_, Guild>(
            "SELECT id, name, description, created_by, created_at FROM guilds WHERE id = ?",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Guild>, AppError> {
        sqlx::query_as::<_, Guild>(
            "SELECT id, name, description, created_by, created_at FROM guilds WHERE name = ?",
        )
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, guild: &Guild) -> Result<Guild, AppError> {
        sqlx::query_as::<_, Guild>(
            "UPDATE guilds SET name = ?, description = ? WHERE id = ? RETURNING id, name, description, created_by, created_at",
        )
            .bind(&guild.name)
            .bind(&guild.description)
            .bind(&guild.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn transfer_leadership(
        &self,
        guild_id: &str,
        old_leader_id: &str,
        new_leader_id: &str,
        old_leader_role: Role,
        new_leader_role: Role,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let now = Utc::now();

        let guild = sqlx::query(
            "UPDATE guilds SET created_by = ? WHERE id = ? AND created_by = ?",
        )
            .bind(new_leader_id)
            .bind(guild_id)
            .bind(old_leader_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if guild.rows_affected() != 1 {
            return Err(AppError::Conflict("Only the current leader can transfer leadership".into()));
        }

        let demoted = sqlx::query(
            "UPDATE users SET role = ?, updated_at = ? WHERE id = ? AND guild_id = ? AND role = 'guild_leader'",
        )
            .bind(old_leader_role.as_str())
            .bind(now)
            .bind(old_leader_id)
            .bind(guild_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if demoted.rows_affected() != 1 {
            return Err(AppError::Conflict("Only the current leader can transfer leadership".into()));
        }

        let promoted = sqlx::query(
            "UPDATE users SET role = ?, updated_at = ? WHERE id = ? AND guild_id = ?",
        )
            .bind(new_leader_role.as_str())
            .bind(now)
            .bind(new_leader_id)
            .bind(guild_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if promoted.rows_affected() != 1 {
            return Err(AppError::Conflict("New leader must be a member of this guild".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
