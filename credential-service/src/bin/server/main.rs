use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenIssuer;
use credential_service::config::Config;
use credential_service::credential::ports::CredentialServicePort;
use credential_service::domain::credential::service::CredentialService;
use credential_service::inbound::http::router::create_router;
use credential_service::outbound::repositories::InMemoryUserStore;
use credential_service::outbound::repositories::PostgresUserStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credential_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "credential-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        jwt_audience = %config.jwt.audience,
        access_token_ttl_minutes = config.jwt.expire_minutes,
        argon2_memory_kib = config.argon2.memory_size,
        argon2_passes = config.argon2.number_of_passes,
        argon2_parallelism = config.argon2.degree_of_parallelism,
        "Configuration loaded"
    );

    let password_hasher = Arc::new(PasswordHasher::new(
        config.argon2.memory_size,
        config.argon2.number_of_passes,
        config.argon2.degree_of_parallelism,
    )?);
    let token_issuer = Arc::new(TokenIssuer::new(
        config.jwt.secret.as_bytes(),
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
        config.jwt.expire_minutes,
    )?);

    let credential_service: Arc<dyn CredentialServicePort> = if config.database.is_in_memory() {
        tracing::warn!(database = "memory", "Using in-memory user store, data is not persisted");
        Arc::new(CredentialService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::clone(&password_hasher),
            Arc::clone(&token_issuer),
        ))
    } else {
        let pg_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database.url)
            .await?;
        tracing::info!(
            max_connections = 5,
            database = "postgresql",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pg_pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        Arc::new(CredentialService::new(
            Arc::new(PostgresUserStore::new(pg_pool)),
            Arc::clone(&password_hasher),
            Arc::clone(&token_issuer),
        ))
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service, token_issuer);
    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
