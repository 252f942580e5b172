use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CreateGuildRequest, TransferLeadershipRequest, UpdateGuildRequest},
    responses::{GuildResponse, MessageResponse, UserResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_guild(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateGuildRequest>,
) -> Result<impl IntoResponse, AppError> {
    let guild = state
        .guild_service
        .create_guild(&payload.name, payload.description, &auth.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(GuildResponse::from(guild))))
}

pub async fn get_guild(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(guild_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let guild = state.guild_service.get_guild(&guild_id).await?;
    Ok(Json(GuildResponse::from(guild)))
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(guild_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let members = state.guild_service.list_members(&guild_id).await?;
    let members: Vec<UserResponse> = members.into_iter().map(UserResponse::from).collect();
    Ok(Json(members))
}

pub async fn update_guild(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(guild_id): Path<String>,
    Json(payload): Json<UpdateGuildRequest>,
) -> Result<impl IntoResponse, AppError> {
    let guild = state
        .guild_service
        .update_guild(&guild_id, &auth.user_id, payload.name, payload.description)
        .await?;

    Ok(Json(GuildResponse::from(guild)))
}

pub async fn join_guild(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(guild_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.guild_service.join_guild(&auth.user_id, &guild_id).await?;

    Ok(Json(MessageResponse {
        message: "Joined guild".to_string(),
    }))
}

pub async fn leave_guild(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(guild_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.guild_service.leave_guild(&auth.user_id, &guild_id).await?;

    Ok(Json(MessageResponse {
        message: "Left guild".to_string(),
    }))
}

pub async fn transfer_leadership(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(guild_id): Path<String>,
    Json(payload): Json<TransferLeadershipRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .guild_service
        .transfer_leadership(&guild_id, &auth.user_id, &payload.new_leader_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Leadership transferred".to_string(),
    }))
}

pub async fn kick_member(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((guild_id, member_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    // Token role gate first; the service still verifies live leadership.
    auth.require_role(&[Role::GuildLeader])?;

    state
        .guild_service
        .kick_member(&guild_id, &auth.user_id, &member_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Member removed".to_string(),
    }))
}
