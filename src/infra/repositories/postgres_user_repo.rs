use crate::domain::{models::user::User, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash, role, guild_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id, username, email, password_hash, role, guild_id, created_at, updated_at",
        )
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.guild_id)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, guild_id, created_at, updated_at FROM users WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, guild_id, created_at, updated_at FROM users WHERE email = $1",
        )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_guild(&self, guild_id: &str) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, guild_id, created_at, updated_at FROM users WHERE guild_id = $1 ORDER BY created_at ASC, id ASC",
        )
            .bind(guild_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn join_guild(&self, user_id: &str, guild_id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET guild_id = $1, updated_at = $2 WHERE id = $3 AND guild_id IS NULL",
        )
            .bind(guild_id)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() != 1 {
            return Err(AppError::Conflict("User is already in a guild".into()));
        }
        Ok(())
    }

    async fn clear_membership(&self, user_id: &str, guild_id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET guild_id = NULL, updated_at = $1 WHERE id = $2 AND guild_id = $3 AND role != 'guild_leader'",
        )
            .bind(Utc::now())
            .bind(user_id)
            .bind(guild_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() != 1 {
            return Err(AppError::Conflict("User is not a member of this guild".into()));
        }
        Ok(())
    }
}
