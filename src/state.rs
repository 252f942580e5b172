use std::sync::Arc;
use crate::domain::ports::{GuildRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, guild_service::GuildService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub guild_repo: Arc<dyn GuildRepository>,
    pub guild_service: Arc<GuildService>,
    pub auth_service: Arc<AuthService>,
}
