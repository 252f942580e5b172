use guild_backend::{
    api::router::create_router,
    config::Config,
    domain::services::{auth_service::AuthService, guild_service::GuildService},
    infra::repositories::{sqlite_guild_repo::SqliteGuildRepo, sqlite_user_repo::SqliteUserRepo},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
        };

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let guild_repo = Arc::new(SqliteGuildRepo::new(pool.clone()));
        let guild_service = Arc::new(GuildService::new(user_repo.clone(), guild_repo.clone()));
        let auth_service = Arc::new(AuthService::new(&config));

        let state = Arc::new(AppState {
            config,
            user_repo,
            guild_repo,
            guild_service,
            auth_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Registers a user and returns the created user body.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Value {
        let payload = json!({
            "username": username,
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED, "register failed in test helper");
        body_json(response).await
    }

    /// Logs in and returns the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let payload = json!({ "email": email, "password": password });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "login failed in test helper");
        let body = body_json(response).await;
        body["token"].as_str().expect("No token in login response").to_string()
    }

    /// Creates a guild as the token's user and returns the guild body.
    pub async fn create_guild(&self, token: &str, name: &str, description: &str) -> Value {
        let payload = json!({ "name": name, "description": description });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/guilds")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED, "create_guild failed in test helper");
        body_json(response).await
    }

    /// Fetches a user row directly; lets tests assert on persisted state.
    pub async fn user_row(&self, user_id: &str) -> (Option<String>, String) {
        sqlx::query_as::<_, (Option<String>, String)>(
            "SELECT guild_id, role FROM users WHERE id = ?",
        )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .expect("user row missing")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
