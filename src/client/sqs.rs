//! AWS SQS queue backend (`sqs` feature)
//!
//! The SDK client is built on the first enqueue from the default AWS
//! credential chain, pinned to the configured region.

use super::queue::{BackendError, QueueBackend};
use async_trait::async_trait;
use tokio::sync::OnceCell;

/// SQS implementation of [`QueueBackend`]
pub struct SqsQueue {
    region: String,
    client: OnceCell<aws_sdk_sqs::Client>,
}

impl SqsQueue {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> &aws_sdk_sqs::Client {
        self.client
            .get_or_init(|| async {
                let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(aws_config::Region::new(self.region.clone()))
                    .load()
                    .await;
                tracing::debug!(region = %self.region, "Initialised SQS client");
                aws_sdk_sqs::Client::new(&sdk_config)
            })
            .await
    }
}

#[async_trait]
impl QueueBackend for SqsQueue {
    async fn enqueue(&self, queue_url: &str, body: String) -> Result<(), BackendError> {
        self.client()
            .await
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await?;
        Ok(())
    }
}
