//! Sends pre-rendered emails from the email queue

use crate::queues::EmailJob;
use crate::services::EmailService;
use async_trait::async_trait;
use job_queue::{JobHandler, QueueError};

pub struct EmailWorker {
    email_service: EmailService,
}

impl EmailWorker {
    pub fn new(email_service: EmailService) -> Self {
        Self { email_service }
    }
}

#[async_trait]
impl JobHandler for EmailWorker {
    async fn handle(&self, payload: serde_json::Value) -> Result<(), QueueError> {
        let job: EmailJob = serde_json::from_value(payload)?;

        // Plain-text fallback for clients that reject HTML.
        let text_body = format!("{} (view this email in an HTML-capable client)", job.subject);

        self.email_service
            .send_html_email(&job.receiver_email, &job.subject, &job.template, &text_body)
            .await
            .map_err(|e| QueueError::Handler(e.to_string()))?;

        tracing::info!(recipient = %job.receiver_email, subject = %job.subject, "email job processed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailSettings;
    use serde_json::json;

    fn noop_worker() -> EmailWorker {
        let settings = EmailSettings {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "noreply@chirp.dev".to_string(),
        };
        EmailWorker::new(EmailService::new(&settings).unwrap())
    }

    #[tokio::test]
    async fn valid_payload_is_processed() {
        let worker = noop_worker();
        let payload = json!({
            "receiver_email": "manny@test.com",
            "subject": "Password Reset",
            "template": "<p>reset</p>",
        });
        worker.handle(payload).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_payload_is_a_handler_error() {
        let worker = noop_worker();
        let result = worker.handle(json!({"nope": true})).await;
        assert!(matches!(result, Err(QueueError::Payload(_))));
    }
}
