use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{guild, health, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(health::ping))

        // Users
        .route("/api/v1/register", post(user::register))
        .route("/api/v1/login", post(user::login))

        // Guilds
        .route("/api/v1/guilds", post(guild::create_guild))
        .route("/api/v1/guilds/{guild_id}", get(guild::get_guild).patch(guild::update_guild))
        .route("/api/v1/guilds/{guild_id}/members", get(guild::list_members))
        .route("/api/v1/guilds/{guild_id}/join", post(guild::join_guild))
        .route("/api/v1/guilds/{guild_id}/leave", delete(guild::leave_guild))
        .route("/api/v1/guilds/{guild_id}/transfer-leadership", post(guild::transfer_leadership))
        .route("/api/v1/guilds/{guild_id}/members/{member_id}", delete(guild::kick_member))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
