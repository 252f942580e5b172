use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::domain::models::{guild::Guild, user::{Role, User}};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub guild_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            guild_id: user.guild_id,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct GuildResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<Guild> for GuildResponse {
    fn from(guild: Guild) -> Self {
        Self {
            id: guild.id,
            name: guild.name,
            description: guild.description,
            created_by: guild.created_by,
            created_at: guild.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
