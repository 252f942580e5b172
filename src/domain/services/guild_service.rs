use std::sync::Arc;

use crate::domain::models::{
    guild::Guild,
    user::{Role, RoleEvent, User},
};
use crate::domain::ports::{GuildRepository, UserRepository};
use crate::error::AppError;
use tracing::info;

/// Guild membership and leadership rules. Every mutation validates against
/// freshly loaded rows and commits through a guarded repository operation,
/// so the invariants (one guild per user, exactly one leader per guild,
/// created_by == leader) hold after every committed call even under
/// concurrent requests.
pub struct GuildService {
    users: Arc<dyn UserRepository>,
    guilds: Arc<dyn GuildRepository>,
}

impl GuildService {
    pub fn new(users: Arc<dyn UserRepository>, guilds: Arc<dyn GuildRepository>) -> Self {
        Self { users, guilds }
    }

    pub async fn create_guild(
        &self,
        name: &str,
        description: Option<String>,
        creator_id: &str,
    ) -> Result<Guild, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Guild name is required".into()));
        }

        if self.guilds.find_by_name(name).await?.is_some() {
            return Err(AppError::Conflict("A guild with this name already exists.".into()));
        }

        let creator = self.users.find_by_id(creator_id).await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if creator.guild_id.is_some() {
            return Err(AppError::Conflict("User is already in a guild".into()));
        }

        let leader_role = creator.role.transition(RoleEvent::GuildCreated)
            .ok_or_else(|| AppError::Conflict("User cannot take guild leadership".into()))?;

        let guild = Guild::new(name.to_string(), description, creator_id.to_string());
        let created = self.guilds.create_with_leader(&guild, creator_id, leader_role).await?;

        info!("Guild created: {} (leader {})", created.id, creator_id);
        Ok(created)
    }

    pub async fn get_guild(&self, guild_id: &str) -> Result<Guild, AppError> {
        self.guilds.find_by_id(guild_id).await?
            .ok_or_else(|| AppError::NotFound("Guild not found".into()))
    }

    pub async fn list_members(&self, guild_id: &str) -> Result<Vec<User>, AppError> {
        // A missing guild is 404, not an empty member list.
        self.get_guild(guild_id).await?;
        self.users.list_by_guild(guild_id).await
    }

    pub async fn update_guild(
        &self,
        guild_id: &str,
        requester_id: &str,
        new_name: Option<String>,
        new_description: Option<String>,
    ) -> Result<Guild, AppError> {
        let mut guild = self.get_guild(guild_id).await?;
        ensure_leader(&guild, requester_id)?;

        let new_name = new_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let new_description = new_description.filter(|d| !d.trim().is_empty());

        if new_name.is_none() && new_description.is_none() {
            return Err(AppError::Validation("Nothing to update".into()));
        }

        if let Some(name) = new_name {
            if name != guild.name && self.guilds.find_by_name(&name).await?.is_some() {
                return Err(AppError::Conflict("A guild with this name already exists.".into()));
            }
            guild.name = name;
        }
        if let Some(description) = new_description {
            guild.description = Some(description);
        }

        let updated = self.guilds.update(&guild).await?;
        info!("Guild updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn join_guild(&self, user_id: &str, guild_id: &str) -> Result<(), AppError> {
        self.get_guild(guild_id).await?;

        let user = self.users.find_by_id(user_id).await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if user.guild_id.is_some() {
            return Err(AppError::Conflict("User is already in a guild".into()));
        }

        self.users.join_guild(user_id, guild_id).await?;
        info!("User {} joined guild {}", user_id, guild_id);
        Ok(())
    }

    pub async fn leave_guild(&self, user_id: &str, guild_id: &str) -> Result<(), AppError> {
        let user = self.users.find_by_id(user_id).await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        ensure_member(&user, guild_id)?;

        if user.role == Role::GuildLeader {
            return Err(AppError::Conflict(
                "Guild leader must transfer leadership before leaving".into(),
            ));
        }

        // Role is preserved on departure; only the membership is cleared.
        self.users.clear_membership(user_id, guild_id).await?;
        info!("User {} left guild {}", user_id, guild_id);
        Ok(())
    }

    pub async fn transfer_leadership(
        &self,
        guild_id: &str,
        current_leader_id: &str,
        new_leader_id: &str,
    ) -> Result<(), AppError> {
        let guild = self.get_guild(guild_id).await?;
        if guild.created_by != current_leader_id {
            return Err(AppError::Conflict("Only the current leader can transfer leadership".into()));
        }

        if new_leader_id == current_leader_id {
            return Err(AppError::Conflict("Cannot transfer leadership to yourself".into()));
        }

        let current_leader = self.users.find_by_id(current_leader_id).await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        if current_leader.guild_id.as_deref() != Some(guild_id)
            || current_leader.role != Role::GuildLeader
        {
            return Err(AppError::Conflict("Only the current leader can transfer leadership".into()));
        }

        let new_leader = self.users.find_by_id(new_leader_id).await?
            .ok_or_else(|| AppError::Conflict("New leader must be a member of this guild".into()))?;
        if new_leader.guild_id.as_deref() != Some(guild_id) {
            return Err(AppError::Conflict("New leader must be a member of this guild".into()));
        }

        let demoted = current_leader.role.transition(RoleEvent::LeadershipYielded)
            .ok_or_else(|| AppError::Conflict("Only the current leader can transfer leadership".into()))?;
        let promoted = new_leader.role.transition(RoleEvent::LeadershipGranted)
            .ok_or_else(|| AppError::Conflict("New leader already holds leadership".into()))?;

        self.guilds
            .transfer_leadership(guild_id, current_leader_id, new_leader_id, demoted, promoted)
            .await?;

        info!("Guild {} leadership transferred: {} -> {}", guild_id, current_leader_id, new_leader_id);
        Ok(())
    }

    pub async fn kick_member(
        &self,
        guild_id: &str,
        leader_id: &str,
        member_id: &str,
    ) -> Result<(), AppError> {
        let guild = self.get_guild(guild_id).await?;
        ensure_leader(&guild, leader_id)?;

        if member_id == leader_id {
            return Err(AppError::Conflict(
                "Guild leader must transfer leadership before leaving".into(),
            ));
        }

        let member = self.users.find_by_id(member_id).await?
            .ok_or_else(|| AppError::NotFound("Member not found".into()))?;
        ensure_member(&member, guild_id)?;

        self.users.clear_membership(member_id, guild_id).await?;
        info!("User {} removed from guild {} by {}", member_id, guild_id, leader_id);
        Ok(())
    }
}

// Authorization checks over already-resolved entities. Authentication
// happened upstream; these only compare ids.

fn ensure_leader(guild: &Guild, caller_id: &str) -> Result<(), AppError> {
    if guild.created_by != caller_id {
        return Err(AppError::Forbidden("Only the guild leader may do this".into()));
    }
    Ok(())
}

fn ensure_member(user: &User, guild_id: &str) -> Result<(), AppError> {
    if user.guild_id.as_deref() != Some(guild_id) {
        return Err(AppError::Conflict("User is not a member of this guild".into()));
    }
    Ok(())
}
