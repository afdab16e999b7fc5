use crate::error::QueueError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};

/// Deferred side-effect function invoked for a dequeued job.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, payload: serde_json::Value) -> Result<(), QueueError>;
}

struct HandlerFn<F>(F);

#[async_trait]
impl<F, Fut> JobHandler for HandlerFn<F>
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), QueueError>> + Send,
{
    async fn handle(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        (self.0)(payload).await
    }
}

/// Wrap an async closure as a [`JobHandler`].
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn JobHandler>
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), QueueError>> + Send + 'static,
{
    Arc::new(HandlerFn(f))
}

#[derive(Clone)]
pub(crate) struct Registration {
    pub handler: Arc<dyn JobHandler>,
    pub permits: Arc<Semaphore>,
}

/// Job-name → handler table with per-job concurrency caps.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, Registration>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler to a job name. At most `concurrency` invocations of the
    /// handler run at once; re-registering a name replaces the handler.
    pub async fn register(&self, job: &str, concurrency: usize, handler: Arc<dyn JobHandler>) {
        let registration = Registration {
            handler,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        };
        self.jobs.write().await.insert(job.to_string(), registration);
    }

    pub(crate) async fn lookup(&self, job: &str) -> Option<Registration> {
        self.jobs.read().await.get(job).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn register_and_lookup() {
        let registry = JobRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();

        registry
            .register(
                "addUserToDB",
                5,
                handler_fn(move |_payload| {
                    let counted = counted.clone();
                    async move {
                        counted.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                }),
            )
            .await;

        let registration = registry.lookup("addUserToDB").await.unwrap();
        registration
            .handler
            .handle(serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.lookup("unknown").await.is_none());
    }

    #[tokio::test]
    async fn concurrency_floor_is_one() {
        let registry = JobRegistry::new();
        registry
            .register("job", 0, handler_fn(|_| async { Ok(()) }))
            .await;
        let registration = registry.lookup("job").await.unwrap();
        assert_eq!(registration.permits.available_permits(), 1);
    }
}
