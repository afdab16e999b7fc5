//! End-to-end email queue flow over the in-memory broker: a rendered email
//! job is enqueued, picked up by the worker loop, handed to the no-op email
//! transport and acked.

use chirp_api::config::EmailSettings;
use chirp_api::queues::{EmailJob, EmailQueue, JOB_FORGOT_PASSWORD_EMAIL};
use chirp_api::services::EmailService;
use chirp_api::workers::EmailWorker;
use job_queue::MemoryBroker;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn noop_email_service() -> EmailService {
    let settings = EmailSettings {
        smtp_host: String::new(),
        smtp_port: 587,
        smtp_username: None,
        smtp_password: None,
        smtp_from: "noreply@chirp.dev".to_string(),
    };
    EmailService::new(&settings).expect("no-op email service")
}

async fn wait_for_acks(broker: &MemoryBroker, queue: &str, expected: u64) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while broker.acked_count(queue).await < expected {
        assert!(Instant::now() < deadline, "timed out waiting for acks");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn email_job_is_processed_and_acked() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = EmailQueue::new(broker.clone());
    queue
        .register(Arc::new(EmailWorker::new(noop_email_service())))
        .await;
    let _worker = queue.start();

    queue
        .add_email_job(
            JOB_FORGOT_PASSWORD_EMAIL,
            &EmailJob {
                receiver_email: "manny@test.com".to_string(),
                subject: "Reset your password".to_string(),
                template: "<p>reset link</p>".to_string(),
            },
        )
        .await
        .expect("enqueue");

    wait_for_acks(&broker, "email", 1).await;
    assert_eq!(broker.pending_count("email").await, 0);
}

#[tokio::test]
async fn enqueue_resolves_before_the_worker_runs() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = EmailQueue::new(broker.clone());
    // No handler registered and no worker loop: acceptance must not depend
    // on processing.

    let start = Instant::now();
    queue
        .add_email_job(
            JOB_FORGOT_PASSWORD_EMAIL,
            &EmailJob {
                receiver_email: "manny@test.com".to_string(),
                subject: "Reset your password".to_string(),
                template: "<p>reset link</p>".to_string(),
            },
        )
        .await
        .expect("enqueue");

    assert!(start.elapsed() < Duration::from_millis(200));
    // Nothing has been handed to a consumer, let alone settled.
    assert_eq!(broker.pending_count("email").await, 0);
    assert_eq!(broker.acked_count("email").await, 0);
}

#[tokio::test]
async fn every_email_job_name_reaches_the_worker() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = EmailQueue::new(broker.clone());
    queue
        .register(Arc::new(EmailWorker::new(noop_email_service())))
        .await;
    let _worker = queue.start();

    for job_name in [
        chirp_api::queues::JOB_FORGOT_PASSWORD_EMAIL,
        chirp_api::queues::JOB_CHANGE_PASSWORD_EMAIL,
        chirp_api::queues::JOB_COMMENTS_EMAIL,
    ] {
        queue
            .add_email_job(
                job_name,
                &EmailJob {
                    receiver_email: "manny@test.com".to_string(),
                    subject: job_name.to_string(),
                    template: "<p>body</p>".to_string(),
                },
            )
            .await
            .expect("enqueue");
    }

    wait_for_acks(&broker, "email", 3).await;
}

#[tokio::test]
async fn malformed_payload_stays_pending() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = EmailQueue::new(broker.clone());
    queue
        .register(Arc::new(EmailWorker::new(noop_email_service())))
        .await;
    let _worker = queue.start();

    // Bypass the typed wrapper to inject a payload the worker cannot decode.
    use job_queue::Broker;
    broker
        .enqueue(
            "email",
            JOB_FORGOT_PASSWORD_EMAIL,
            &serde_json::json!({"unexpected": "shape"}),
        )
        .await
        .expect("enqueue");

    // Give the worker time to attempt it; the delivery must not be acked.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(broker.acked_count("email").await, 0);
    assert_eq!(broker.pending_count("email").await, 1);
}
