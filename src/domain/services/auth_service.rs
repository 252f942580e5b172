use crate::domain::models::{auth::Claims, user::User};
use crate::config::Config;
use crate::error::AppError;
use jsonwebtoken::{encode, EncodingKey, Header};
use chrono::{Duration, Utc};

pub struct AuthService {
    encoding_key: EncodingKey,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Issues a one-hour HS256 access token carrying the user's id and role.
    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            exp: (now + Duration::hours(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }
}
