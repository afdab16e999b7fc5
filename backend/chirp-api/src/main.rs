/// Chirp API main entry point
///
/// Starts the HTTP server with:
/// - PostgreSQL connection pool (migrations applied at boot)
/// - Redis connection manager (user cache)
/// - Redis Streams broker + one worker loop per domain queue
/// - Email service (SMTP or no-op)
/// - Websocket registry for realtime push
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use chirp_api::{
    app_state::AppState, config::Settings, openapi::ApiDoc, routes, services::EmailService,
    workers,
};
use job_queue::RedisBroker;
use redis_utils::RedisPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "chirp_api=info,info".into()),
        )
        .with_target(false)
        .init();

    info!("Starting Chirp API");

    let settings = Settings::load().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .min_connections(settings.database.min_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout))
        .connect(&settings.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!(
        "Database pool initialized with {} max connections",
        settings.database.max_connections
    );

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let redis_pool = RedisPool::connect(&settings.redis.url)
        .await
        .context("Failed to connect to Redis")?;
    let redis = redis_pool.manager();

    let broker = Arc::new(
        RedisBroker::new(&settings.redis.url).context("Failed to initialize job broker")?,
    );

    let email_service =
        EmailService::new(&settings.email).context("Failed to initialize email service")?;
    if email_service.is_enabled() {
        info!("Email service initialized with SMTP");
    } else {
        info!("Email service running in no-op mode (SMTP not configured)");
    }

    let bind_addr = (settings.server.host.clone(), settings.server.port);
    let jwt_secret = settings.jwt.secret.clone();

    let state = AppState::new(settings, pool, redis, email_service, broker);

    // One worker loop per queue; the handles stop the loops when dropped.
    let _queue_workers = workers::start_workers(&state).await;
    info!("Queue workers started");

    info!("HTTP server listening on {}:{}", bind_addr.0, bind_addr.1);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(TracingLogger::default())
            .wrap(cors)
            .configure(|cfg| routes::configure(cfg, &jwt_secret))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server terminated")?;

    Ok(())
}
