pub mod auth_service;
pub mod guild_service;
