pub mod sqlite_guild_repo;
pub mod sqlite_user_repo;

pub mod postgres_guild_repo;
pub mod postgres_user_repo;
