//! Queue behaviour tests against the in-memory broker.

use job_queue::{Broker, JobQueue, MemoryBroker, handler_fn};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Serialize)]
struct EmailJob {
    receiver_email: String,
    subject: String,
    template: String,
}

async fn wait_until<F: Fn() -> bool>(cond: F, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

#[tokio::test]
async fn add_job_resolves_on_acceptance_not_processing() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = Arc::new(JobQueue::new("email", broker.clone()));

    let processed = Arc::new(AtomicUsize::new(0));
    let counted = processed.clone();
    queue
        .process_job(
            "forgotPasswordEmail",
            5,
            handler_fn(move |_payload| {
                let counted = counted.clone();
                async move {
                    // Deliberately slow worker.
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    counted.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
        )
        .await;
    let _worker = queue.clone().start();

    let job = EmailJob {
        receiver_email: "manny@test.com".into(),
        subject: "Reset your password".into(),
        template: "<p>hi</p>".into(),
    };

    let started = Instant::now();
    let id = queue.add_job("forgotPasswordEmail", &job).await.unwrap();
    let enqueue_latency = started.elapsed();

    assert!(!id.is_empty());
    // Enqueue must not wait for the 500ms handler.
    assert!(
        enqueue_latency < Duration::from_millis(200),
        "enqueue took {:?}, appears to await processing",
        enqueue_latency
    );
    assert_eq!(processed.load(Ordering::SeqCst), 0);

    let done = processed.clone();
    assert!(wait_until(|| done.load(Ordering::SeqCst) == 1, Duration::from_secs(3)).await);

    // Settled with the broker once the handler finished.
    let deadline = Instant::now() + Duration::from_secs(1);
    while broker.acked_count("email").await != 1 {
        assert!(Instant::now() < deadline, "delivery never acked");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn concurrency_cap_bounds_in_flight_handlers() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = Arc::new(JobQueue::new("chat", broker));

    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));
    let processed = Arc::new(AtomicUsize::new(0));

    let (flight, peak, count) = (in_flight.clone(), max_seen.clone(), processed.clone());
    queue
        .process_job(
            "addChatMessageToDB",
            2,
            handler_fn(move |_payload| {
                let (flight, peak, count) = (flight.clone(), peak.clone(), count.clone());
                async move {
                    let now = flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    flight.fetch_sub(1, Ordering::SeqCst);
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
        )
        .await;
    let _worker = queue.clone().start();

    for i in 0..8 {
        queue
            .add_job("addChatMessageToDB", &serde_json::json!({ "seq": i }))
            .await
            .unwrap();
    }

    let done = processed.clone();
    assert!(wait_until(|| done.load(Ordering::SeqCst) == 8, Duration::from_secs(5)).await);
    assert!(
        max_seen.load(Ordering::SeqCst) <= 2,
        "peak concurrency {} exceeded cap",
        max_seen.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn unregistered_job_is_settled_not_redelivered() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = Arc::new(JobQueue::new("auth", broker.clone()));
    queue
        .process_job("addAuthUserToDB", 3, handler_fn(|_| async { Ok(()) }))
        .await;
    let _worker = queue.clone().start();

    queue
        .add_job("someRetiredJobName", &serde_json::json!({}))
        .await
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(3);
    while broker.acked_count("auth").await != 1 {
        assert!(Instant::now() < deadline, "unhandled job never settled");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(broker.pending_count("auth").await, 0);
}

#[tokio::test]
async fn failed_handler_leaves_delivery_pending() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = Arc::new(JobQueue::new("user", broker.clone()));

    queue
        .process_job(
            "addUserToDB",
            1,
            handler_fn(|_| async { Err(job_queue::QueueError::Handler("db down".into())) }),
        )
        .await;
    let _worker = queue.clone().start();

    queue
        .add_job("addUserToDB", &serde_json::json!({"username": "Manny"}))
        .await
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(3);
    while broker.pending_count("user").await != 1 {
        assert!(Instant::now() < deadline, "delivery never reached pending");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(broker.acked_count("user").await, 0);
}

#[tokio::test]
async fn failed_delivery_is_retried_until_acked() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = Arc::new(
        JobQueue::new("email", broker.clone()).with_redeliver_idle(Duration::from_millis(100)),
    );

    let attempts = Arc::new(AtomicUsize::new(0));
    let counted = attempts.clone();
    queue
        .process_job(
            "forgotPasswordEmail",
            5,
            handler_fn(move |_payload| {
                let counted = counted.clone();
                async move {
                    // First attempt fails (say SMTP is down), the retry succeeds.
                    if counted.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(job_queue::QueueError::Handler("smtp unavailable".into()))
                    } else {
                        Ok(())
                    }
                }
            }),
        )
        .await;
    let _worker = queue.clone().start();

    queue
        .add_job("forgotPasswordEmail", &serde_json::json!({}))
        .await
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while broker.acked_count("email").await != 1 {
        assert!(
            Instant::now() < deadline,
            "failed delivery was never redelivered, attempts: {}",
            attempts.load(Ordering::SeqCst)
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(attempts.load(Ordering::SeqCst) >= 2);
    assert_eq!(broker.pending_count("email").await, 0);
}

#[tokio::test]
async fn enqueue_is_durable_without_a_running_worker() {
    let broker = Arc::new(MemoryBroker::new());
    let queue = JobQueue::new("notification", broker.clone());

    let id = queue
        .add_job("updateNotification", &serde_json::json!({"read": true}))
        .await
        .unwrap();
    assert!(!id.is_empty());

    // Entry is waiting for a consumer, not lost.
    let batch = broker
        .read_batch("notification", "g", "c", 10, Duration::from_millis(10))
        .await
        .unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].payload["read"], serde_json::json!(true));
}
