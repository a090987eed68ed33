use std::future::Future;

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::queue::Message;

/// Trait for message handlers attached to a queue processor.
///
/// A handler receives one message per call and reports success or failure;
/// nothing else is assumed about what it does (database writes, further
/// publishes and pure computation are all valid). A handler that fails, or
/// that panics, leaves its message in the queue for redelivery, so handlers
/// must tolerate seeing the same message more than once.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Processes one delivery.
    async fn handle(&self, message: &Message) -> Result<(), HandlerError>;
}

/// Adapter implementing [`MessageHandler`] for a plain async function.
///
/// Lets a closure be registered with the supervisor without writing a trait
/// impl, mirroring the functional half of the registration API.
///
/// # Type Parameters
///
/// * `F` - The message handler function type
/// * `Fut` - The future returned by the handler function
pub struct HandlerFn<F> {
    handler_fn: F,
}

impl<F, Fut> HandlerFn<F>
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    pub fn new(handler_fn: F) -> Self {
        HandlerFn { handler_fn }
    }
}

#[async_trait]
impl<F, Fut> MessageHandler for HandlerFn<F>
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        (self.handler_fn)(message.clone()).await
    }
}
