use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::handler::MessageHandler;
use crate::queue::{Message, QueueClient};

mod config;

pub use config::ProcessorConfig;

/// Lifecycle of one processor as observed from the outside.
///
/// Transitions only ever move forward: `Registered` → `Running` → `Stopping`
/// → `Stopped`. `Stopped` is terminal; a stopped processor cannot be
/// restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProcessorStatus {
    /// Registered with a supervisor, not yet started.
    Registered = 0,
    /// Polling loop is live.
    Running = 1,
    /// Shutdown requested; in-flight work may still be finishing.
    Stopping = 2,
    /// The loop has returned.
    Stopped = 3,
}

/// Shared status slot, written by the processor loop and by the supervisor
/// (which marks `Stopping` the moment shutdown fires).
#[derive(Debug)]
pub(crate) struct StatusCell(AtomicU8);

impl StatusCell {
    pub(crate) fn new() -> Self {
        StatusCell(AtomicU8::new(ProcessorStatus::Registered as u8))
    }

    pub(crate) fn get(&self) -> ProcessorStatus {
        match self.0.load(Ordering::Acquire) {
            0 => ProcessorStatus::Registered,
            1 => ProcessorStatus::Running,
            2 => ProcessorStatus::Stopping,
            _ => ProcessorStatus::Stopped,
        }
    }

    pub(crate) fn store(&self, status: ProcessorStatus) {
        self.0.store(status as u8, Ordering::Release);
    }

    /// Moves `from` → `to` if the cell still holds `from`. Keeps concurrent
    /// writers (loop and supervisor) from stepping a status backwards.
    pub(crate) fn advance(&self, from: ProcessorStatus, to: ProcessorStatus) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Drives one queue-to-handler binding from "forever poll" to quiescent
/// shutdown.
///
/// The loop guarantees that every received message is offered to the handler
/// exactly once per delivery, and that a message is deleted from the queue if
/// and only if that handler call returned success. Failed or panicking
/// handler calls leave the message alone; redelivery after the visibility
/// timeout is the queue's job.
pub struct MessageProcessor<C>
where
    C: QueueClient + ?Sized,
{
    client: Arc<C>,
    queue_url: String,
    handler: Arc<dyn MessageHandler>,
    config: ProcessorConfig,
    status: Arc<StatusCell>,
}

impl<C> MessageProcessor<C>
where
    C: QueueClient + ?Sized,
{
    pub fn new(
        client: Arc<C>,
        queue_url: &str,
        handler: Arc<dyn MessageHandler>,
        config: ProcessorConfig,
    ) -> Self {
        MessageProcessor {
            client,
            queue_url: queue_url.to_string(),
            handler,
            config,
            status: Arc::new(StatusCell::new()),
        }
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    pub fn status(&self) -> ProcessorStatus {
        self.status.get()
    }

    pub(crate) fn status_cell(&self) -> Arc<StatusCell> {
        Arc::clone(&self.status)
    }

    /// Runs the poll-dispatch-acknowledge loop until `shutdown` fires.
    ///
    /// The signal is checked before every receive, so no new network round
    /// trip starts once shutdown is requested; a receive or handler call
    /// already in flight runs to completion. Transport errors never
    /// terminate the loop, they only delay the next poll by the configured
    /// backoff.
    pub async fn run(self, shutdown: CancellationToken) {
        self.status
            .advance(ProcessorStatus::Registered, ProcessorStatus::Running);

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            let received = self
                .client
                .receive(
                    &self.queue_url,
                    self.config.max_messages,
                    self.config.wait_time_seconds,
                    self.config.visibility_timeout_seconds,
                )
                .await;

            match received {
                Ok(messages) => {
                    for message in &messages {
                        self.dispatch(message).await;
                    }
                }
                Err(e) => {
                    warn!(
                        queue_url = %self.queue_url,
                        error = %e,
                        backoff_ms = self.config.error_backoff.as_millis() as u64,
                        "error receiving messages, backing off"
                    );
                    // The backoff sleep yields early on shutdown; the loop
                    // then re-checks the signal before any new receive.
                    tokio::select! {
                        _ = shutdown.cancelled() => {}
                        _ = tokio::time::sleep(self.config.error_backoff) => {}
                    }
                }
            }
        }

        self.status
            .advance(ProcessorStatus::Running, ProcessorStatus::Stopping);
        self.status.store(ProcessorStatus::Stopped);
        info!(queue_url = %self.queue_url, "message processor stopped");
    }

    /// Offers one message to the handler and deletes it on success.
    ///
    /// A panicking handler is contained here and treated the same as a
    /// returned failure. A failed delete is logged and otherwise ignored:
    /// the message was processed, and its reappearance after the visibility
    /// timeout is the documented at-least-once duplicate exposure handlers
    /// must tolerate.
    async fn dispatch(&self, message: &Message) {
        match AssertUnwindSafe(self.handler.handle(message))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {
                if let Err(e) = self
                    .client
                    .delete(&self.queue_url, &message.receipt_handle)
                    .await
                {
                    warn!(
                        queue_url = %self.queue_url,
                        message_id = %message.id,
                        error = %e,
                        "failed to delete processed message"
                    );
                }
            }
            Ok(Err(e)) => {
                warn!(
                    queue_url = %self.queue_url,
                    message_id = %message.id,
                    error = %e,
                    "error handling message, leaving it for redelivery"
                );
            }
            Err(_) => {
                error!(
                    queue_url = %self.queue_url,
                    message_id = %message.id,
                    "handler panicked, leaving message for redelivery"
                );
            }
        }
    }
}
