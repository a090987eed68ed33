use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::errors::{HandlerError, SupervisorError};
use crate::handler::{HandlerFn, MessageHandler};
use crate::processor::{MessageProcessor, ProcessorConfig, ProcessorStatus, StatusCell};
use crate::queue::{Message, QueueClient};

/// Owns every registered queue processor and coordinates their lifecycle.
///
/// Registrations are collected before [`start`](Self::start), which launches
/// one independent tokio task per registration, all sharing a single one-shot
/// shutdown signal. [`stop`](Self::stop) triggers that signal and blocks
/// until every launched loop has returned.
///
/// Processors on distinct queues never block each other; a registration is a
/// plain (queue URL, handler) pair, and registering the same queue twice runs
/// two independent processors against it (the caller's responsibility to
/// avoid, if unwanted).
pub struct ProcessorSupervisor<C>
where
    C: QueueClient + ?Sized + 'static,
{
    client: Arc<C>,
    pending: Vec<MessageProcessor<C>>,
    watched: Vec<(String, Arc<StatusCell>)>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    started: bool,
}

impl<C> ProcessorSupervisor<C>
where
    C: QueueClient + ?Sized + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        ProcessorSupervisor {
            client,
            pending: Vec::new(),
            watched: Vec::new(),
            shutdown: CancellationToken::new(),
            tracker: TaskTracker::new(),
            started: false,
        }
    }

    /// Registers a handler for one queue.
    ///
    /// Must be called before [`start`](Self::start); the registration set is
    /// immutable once the processors are launched. `config` falls back to
    /// [`ProcessorConfig::default`] when `None`.
    pub fn register<H>(
        &mut self,
        queue_url: &str,
        handler: H,
        config: Option<ProcessorConfig>,
    ) -> Result<(), SupervisorError>
    where
        H: MessageHandler + 'static,
    {
        if self.started {
            return Err(SupervisorError::AlreadyStarted);
        }

        self.pending.push(MessageProcessor::new(
            Arc::clone(&self.client),
            queue_url,
            Arc::new(handler),
            config.unwrap_or_default(),
        ));

        Ok(())
    }

    /// Registers a plain async function as the handler for one queue.
    pub fn register_fn<F, Fut>(
        &mut self,
        queue_url: &str,
        handler_fn: F,
        config: Option<ProcessorConfig>,
    ) -> Result<(), SupervisorError>
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.register(queue_url, HandlerFn::new(handler_fn), config)
    }

    /// Launches every registered processor as an independent task.
    ///
    /// Returns immediately; none of the loops are awaited here. Calling
    /// `start` a second time is an error.
    pub fn start(&mut self) -> Result<(), SupervisorError> {
        if self.started {
            return Err(SupervisorError::AlreadyStarted);
        }
        self.started = true;

        for processor in self.pending.drain(..) {
            let status = processor.status_cell();
            status.advance(ProcessorStatus::Registered, ProcessorStatus::Running);
            self.watched
                .push((processor.queue_url().to_string(), status));
            self.tracker.spawn(processor.run(self.shutdown.clone()));
        }
        self.tracker.close();

        info!(processors = self.watched.len(), "message processors started");
        Ok(())
    }

    /// Triggers shutdown and waits until every processor has stopped.
    ///
    /// The signal is one-shot: the first call cancels it, later calls are
    /// no-ops that return as soon as the already-stopped loops are accounted
    /// for. There is deliberately no timeout here; the wait is bounded by the
    /// slowest in-flight receive-plus-batch cycle, and callers needing a
    /// bounded shutdown wrap this in their own timeout.
    pub async fn stop(&self) {
        // Close unconditionally so that stopping a never-started supervisor
        // does not wait forever on an open tracker.
        self.tracker.close();
        self.shutdown.cancel();
        for (_, status) in &self.watched {
            status.advance(ProcessorStatus::Running, ProcessorStatus::Stopping);
        }
        self.tracker.wait().await;
        info!("all message processors stopped");
    }

    /// Current status of every registration, in registration order.
    pub fn statuses(&self) -> Vec<(String, ProcessorStatus)> {
        self.pending
            .iter()
            .map(|p| (p.queue_url().to_string(), p.status()))
            .chain(
                self.watched
                    .iter()
                    .map(|(queue_url, status)| (queue_url.clone(), status.get())),
            )
            .collect()
    }
}
