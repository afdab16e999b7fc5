//! Handler flows against real PostgreSQL and Redis.
//!
//! All tests here are ignore-gated; run them with a reachable DATABASE_URL
//! and REDIS_URL:
//!
//!   cargo test -p chirp-api --test api_flows -- --ignored

use actix_web::{test, web, App};
use chirp_api::app_state::AppState;
use chirp_api::config::{
    ClientSettings, DatabaseSettings, EmailSettings, JwtSettings, RedisSettings, ServerSettings,
    Settings,
};
use chirp_api::db::{auth_repo, post_repo, user_repo};
use chirp_api::queues::{CommentJob, EmailQueue};
use chirp_api::routes;
use chirp_api::services::EmailService;
use chirp_api::websocket::SocketRegistry;
use chirp_api::workers::{self, CommentWorker};
use job_queue::{Broker, JobHandler, MemoryBroker};
use redis_utils::RedisPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseSettings {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: 10,
        },
        redis: RedisSettings {
            url: std::env::var("REDIS_URL").expect("REDIS_URL"),
        },
        jwt: JwtSettings {
            secret: "api-flows-secret".to_string(),
            expiry_seconds: 3600,
        },
        // Empty SMTP host puts the email service into no-op mode.
        email: EmailSettings {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "noreply@chirp.dev".to_string(),
        },
        client: ClientSettings {
            url: "http://localhost:3000".to_string(),
        },
    }
}

async fn test_state(broker: Arc<MemoryBroker>) -> AppState {
    let settings = test_settings();

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await
        .expect("postgres connection");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let redis = RedisPool::connect(&settings.redis.url)
        .await
        .expect("redis connection")
        .manager();
    let email_service = EmailService::new(&settings.email).expect("no-op email service");

    AppState::new(settings, pool, redis, email_service, broker)
}

/// Usernames must fit the 4..=8 character rule.
fn random_username() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[tokio::test]
#[ignore] // Requires database setup (DATABASE_URL, REDIS_URL)
async fn signin_with_unknown_username_is_rejected() {
    let state = test_state(Arc::new(MemoryBroker::new())).await;
    let secret = state.settings.jwt.secret.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(|cfg| routes::configure(cfg, &secret)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signin")
        .set_json(serde_json::json!({
            "username": random_username(),
            "password": "qwerty",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 400);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid credentials");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
#[ignore] // Requires database setup (DATABASE_URL, REDIS_URL)
async fn signup_then_signin_issues_a_token() {
    let broker = Arc::new(MemoryBroker::new());
    let state = test_state(broker).await;
    let _workers = workers::start_workers(&state).await;
    let secret = state.settings.jwt.secret.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(|cfg| routes::configure(cfg, &secret)),
    )
    .await;

    let username = random_username();
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(serde_json::json!({
            "username": username,
            "password": "qwerty",
            "email": format!("{}@test.com", username),
            "avatar_color": "red",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 201);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    // The credential row is persisted write-behind; poll signin until the
    // auth worker has caught up.
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/signin")
            .set_json(serde_json::json!({
                "username": username,
                "password": "qwerty",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        if res.status() == 200 {
            let body: serde_json::Value = test::read_body_json(res).await;
            assert_eq!(body["message"], "User login successfully");
            assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
            break;
        }
        assert!(Instant::now() < deadline, "signin never succeeded");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
#[ignore] // Requires database setup (DATABASE_URL, REDIS_URL)
async fn duplicate_signup_enqueues_no_jobs() {
    let broker = Arc::new(MemoryBroker::new());
    let state = test_state(broker.clone()).await;
    let secret = state.settings.jwt.secret.clone();

    // Seed the existing account directly; no workers are running, so any
    // broker traffic below can only come from the duplicate signup.
    let username = random_username();
    let email = format!("{}@test.com", username);
    auth_repo::create_auth_user(&state.pool, Uuid::new_v4(), &username, &email, "hash", "red")
        .await
        .expect("seed auth row");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(|cfg| routes::configure(cfg, &secret)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(serde_json::json!({
            "username": username,
            "password": "qwerty",
            "email": email,
            "avatar_color": "blue",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 400);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid credentials");

    // Nothing reached either persistence queue.
    for queue in ["auth", "user"] {
        let batch = broker
            .read_batch(queue, "g", "c", 10, Duration::from_millis(10))
            .await
            .expect("broker read");
        assert!(batch.is_empty(), "unexpected job on the {queue} queue");
    }
}

async fn count_rows(pool: &PgPool, query: &str, id: Uuid) -> i64 {
    sqlx::query_scalar(query)
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("count query")
}

#[tokio::test]
#[ignore] // Requires database setup (DATABASE_URL, REDIS_URL)
async fn redelivered_comment_job_keeps_effects_single() {
    let broker = Arc::new(MemoryBroker::new());
    let state = test_state(broker.clone()).await;

    let commenter = random_username();
    let owner = random_username();
    let owner_id = Uuid::new_v4();
    user_repo::create_user(
        &state.pool,
        owner_id,
        &owner,
        &format!("{}@test.com", owner),
        "green",
    )
    .await
    .expect("seed post owner");
    let post = post_repo::create_post(&state.pool, owner_id, &owner, "hello world")
        .await
        .expect("seed post");

    let worker = CommentWorker::new(
        state.pool.clone(),
        state.redis.clone(),
        SocketRegistry::new(),
        EmailQueue::new(broker),
    );

    let job = CommentJob {
        comment_id: Uuid::new_v4(),
        post_id: post.id,
        user_from: Uuid::new_v4(),
        user_to: owner_id,
        username: commenter,
        avatar_color: "red".to_string(),
        comment: "nice post".to_string(),
    };
    let payload = serde_json::to_value(&job).expect("job payload");

    // Same delivery processed twice, as after a redelivery.
    worker.handle(payload.clone()).await.expect("first attempt");
    worker.handle(payload).await.expect("redelivered attempt");

    let comments = count_rows(
        &state.pool,
        "SELECT COUNT(*) FROM comments WHERE id = $1",
        job.comment_id,
    )
    .await;
    assert_eq!(comments, 1, "comment row duplicated");

    let notifications = count_rows(
        &state.pool,
        "SELECT COUNT(*) FROM notifications WHERE created_item_id = $1",
        job.comment_id,
    )
    .await;
    assert_eq!(notifications, 1, "notification duplicated");

    let post = post_repo::find_by_id(&state.pool, post.id)
        .await
        .expect("post lookup")
        .expect("post exists");
    assert_eq!(post.comments_count, 1, "counter bumped more than once");
}
