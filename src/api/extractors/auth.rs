use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::Span;

/// Verified identity recovered from the bearer token. The role is the one
/// encoded at issue time; identity-sensitive operations re-check against
/// live rows in the service layer.
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl AuthUser {
    /// Role gate in the manner of a requires-roles guard: rejects before
    /// the core operation runs.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if !allowed.contains(&self.role) {
            return Err(AppError::Forbidden("Insufficient role".into()));
        }
        Ok(())
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let decoding_key = DecodingKey::from_secret(app_state.config.jwt_secret.as_bytes());

        let token_data = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|_| AppError::Unauthorized)?;

        Span::current().record("user_id", &token_data.claims.sub);

        Ok(AuthUser {
            user_id: token_data.claims.sub,
            role: token_data.claims.role,
        })
    }
}
