use crate::domain::models::{guild::Guild, user::{Role, User}};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Members of a guild in insertion order (created_at, then id).
    async fn list_by_guild(&self, guild_id: &str) -> Result<Vec<User>, AppError>;
    /// Guarded join: only succeeds while the user has no guild.
    async fn join_guild(&self, user_id: &str, guild_id: &str) -> Result<(), AppError>;
    /// Guarded leave/kick: only succeeds while the user is a non-leader
    /// member of exactly this guild. The role is left untouched.
    async fn clear_membership(&self, user_id: &str, guild_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait GuildRepository: Send + Sync {
    /// Atomically inserts the guild and promotes its creator. Either both
    /// rows land or neither does.
    async fn create_with_leader(
        &self,
        guild: &Guild,
        leader_id: &str,
        leader_role: Role,
    ) -> Result<Guild, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Guild>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Guild>, AppError>;
    async fn update(&self, guild: &Guild) -> Result<Guild, AppError>;
    /// Atomically moves created_by and swaps both members' roles,
    /// re-validating leadership inside the transaction.
    async fn transfer_leadership(
        &self,
        guild_id: &str,
        old_leader_id: &str,
        new_leader_id: &str,
        old_leader_role: Role,
        new_leader_role: Role,
    ) -> Result<(), AppError>;
}
