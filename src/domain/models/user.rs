use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    GuildLeader,
    Raider,
    Recruiter,
}

/// Events that may change a user's role. Any (role, event) pair missing
/// from the transition table is an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleEvent {
    GuildCreated,
    LeadershipGranted,
    LeadershipYielded,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::GuildLeader => "guild_leader",
            Role::Raider => "raider",
            Role::Recruiter => "recruiter",
        }
    }

    pub fn transition(self, event: RoleEvent) -> Option<Role> {
        match (self, event) {
            (Role::Member | Role::Raider | Role::Recruiter, RoleEvent::GuildCreated) => {
                Some(Role::GuildLeader)
            }
            (Role::Member | Role::Raider | Role::Recruiter, RoleEvent::LeadershipGranted) => {
                Some(Role::GuildLeader)
            }
            (Role::GuildLeader, RoleEvent::LeadershipYielded) => Some(Role::Member),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseRoleError(String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let role = match value.as_str() {
            "member" => Some(Role::Member),
            "guild_leader" => Some(Role::GuildLeader),
            "raider" => Some(Role::Raider),
            "recruiter" => Some(Role::Recruiter),
            _ => None,
        };
        role.ok_or(ParseRoleError(value))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub guild_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            role: Role::Member,
            guild_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creating_a_guild_promotes_any_non_leader() {
        for role in [Role::Member, Role::Raider, Role::Recruiter] {
            assert_eq!(role.transition(RoleEvent::GuildCreated), Some(Role::GuildLeader));
        }
    }

    #[test]
    fn leader_cannot_be_granted_leadership_again() {
        assert_eq!(Role::GuildLeader.transition(RoleEvent::LeadershipGranted), None);
        assert_eq!(Role::GuildLeader.transition(RoleEvent::GuildCreated), None);
    }

    #[test]
    fn only_the_leader_can_yield_leadership() {
        assert_eq!(Role::GuildLeader.transition(RoleEvent::LeadershipYielded), Some(Role::Member));
        assert_eq!(Role::Member.transition(RoleEvent::LeadershipYielded), None);
        assert_eq!(Role::Raider.transition(RoleEvent::LeadershipYielded), None);
    }

    #[test]
    fn role_round_trips_through_storage_form() {
        for role in [Role::Member, Role::GuildLeader, Role::Raider, Role::Recruiter] {
            assert_eq!(Role::try_from(role.as_str().to_string()), Ok(role));
        }
        assert!(Role::try_from("warlock".to_string()).is_err());
    }
}
