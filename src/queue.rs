use async_trait::async_trait;
use tracing::warn;

use crate::errors::QueueError;

/// One delivery of a message from a queue.
///
/// The receipt handle is only valid for this delivery: a message redelivered
/// after a failed acknowledgment carries a new handle, while the id may
/// repeat. The handle is required to delete the message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Unique identifier of this delivery.
    pub id: String,

    /// Single-use token proving this delivery, consumed by `delete`.
    pub receipt_handle: String,

    /// Text payload.
    pub body: String,
}

/// Contract for the queue collaborator a processor polls.
///
/// Both calls are network I/O and may fail independently of each other and of
/// message content. The durable queue behind this interface is at-least-once
/// and does not guarantee ordering.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Receives up to `max_messages` messages from the queue, long-polling
    /// for up to `wait_time_seconds`. Received messages stay hidden from
    /// other receivers for `visibility_timeout_seconds`.
    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: i32,
        visibility_timeout_seconds: i32,
    ) -> Result<Vec<Message>, QueueError>;

    /// Deletes one delivery by its receipt handle.
    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError>;
}

/// Production queue client backed by AWS SQS.
#[derive(Debug, Clone)]
pub struct SqsQueueClient {
    sqs_client: aws_sdk_sqs::Client,
}

impl SqsQueueClient {
    pub fn new(sqs_client: aws_sdk_sqs::Client) -> Self {
        SqsQueueClient { sqs_client }
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: i32,
        visibility_timeout_seconds: i32,
    ) -> Result<Vec<Message>, QueueError> {
        let output = self
            .sqs_client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_time_seconds)
            .visibility_timeout(visibility_timeout_seconds)
            .send()
            .await
            .map_err(|e| QueueError::Receive(e.to_string()))?;

        let mut messages = Vec::new();
        for message in output.messages() {
            // A delivery without a receipt handle cannot be acknowledged and
            // one without a body cannot be processed; skip both.
            let (Some(receipt_handle), Some(body)) = (message.receipt_handle(), message.body())
            else {
                warn!(
                    queue_url,
                    message_id = message.message_id().unwrap_or_default(),
                    "received a message with no body or receipt handle"
                );
                continue;
            };

            messages.push(Message {
                id: message.message_id().unwrap_or_default().to_string(),
                receipt_handle: receipt_handle.to_string(),
                body: body.to_string(),
            });
        }

        Ok(messages)
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        self.sqs_client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::Delete(e.to_string()))?;

        Ok(())
    }
}
