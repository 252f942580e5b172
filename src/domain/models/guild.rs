use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// created_by always points at the current leader, not the historical
/// founder. Leadership transfer reassigns it.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Guild {
    pub fn new(name: String, description: Option<String>, created_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            created_by,
            created_at: Utc::now(),
        }
    }
}
