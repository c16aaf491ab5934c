#![allow(dead_code)]

use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenIssuer;
use credential_service::domain::credential::service::CredentialService;
use credential_service::inbound::http::router::create_router;
use credential_service::outbound::repositories::InMemoryUserStore;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const JWT_ISSUER: &str = "credential-service";
pub const JWT_AUDIENCE: &str = "api-clients";

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_issuer: Arc<TokenIssuer>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap KDF parameters keep the suite fast
        let password_hasher =
            Arc::new(PasswordHasher::new(1024, 1, 1).expect("Invalid Argon2 parameters"));
        let token_issuer = Arc::new(
            TokenIssuer::new(JWT_SECRET, JWT_ISSUER, JWT_AUDIENCE, 15)
                .expect("Invalid token lifetime"),
        );

        let credential_service = Arc::new(CredentialService::new(
            Arc::new(InMemoryUserStore::new()),
            password_hasher,
            Arc::clone(&token_issuer),
        ));

        let router = create_router(credential_service, Arc::clone(&token_issuer));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_issuer,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response
    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/register")
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/login")
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Exchange a refresh token and return the response
    pub async fn refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.post("/api/v1/auth/refresh")
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in a user, returning the token payload
    pub async fn register_and_login(&self, username: &str, password: &str) -> Value {
        let response = self.register(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}

/// Test database helper
///
/// Each instance owns a freshly created, migrated database on the server
/// named by `DATABASE_URL`.
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    server_url: String,
}

impl TestDb {
    /// Create a new test database with a unique name.
    ///
    /// Returns `None` when `DATABASE_URL` is not set, so Postgres-backed
    /// tests are skipped on machines without a server.
    pub async fn new() -> Option<Self> {
        let Ok(server_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres-backed test");
            return None;
        };

        let db_name = format!(
            "test_credential_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            server_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let server_url = self.server_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&server_url).await {
                let _ = conn
                    .execute(
                        format!(r#"DROP DATABASE IF EXISTS "{}" WITH (FORCE);"#, db_name).as_str(),
                    )
                    .await;
            }
        });
    }
}
