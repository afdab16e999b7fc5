use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("broker error: {0}")]
    Broker(String),

    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("handler error: {0}")]
    Handler(String),
}

impl From<redis::RedisError> for QueueError {
    fn from(err: redis::RedisError) -> Self {
        QueueError::Broker(err.to_string())
    }
}
