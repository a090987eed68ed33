#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use products_api::errors::QueueError;
use products_api::processor::ProcessorConfig;
use products_api::queue::{Message, QueueClient};

/// One scripted outcome for a receive call against a queue.
pub enum ReceiveStep {
    /// Return these messages immediately.
    Messages(Vec<Message>),
    /// Fail with a transport error.
    Error(&'static str),
    /// Stay in flight for the given duration, then return these messages.
    Delay(Duration, Vec<Message>),
}

/// Everything the processors did, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Receive(String),
    Handle(String),
    Delete(String),
}

/// Scripted stand-in for the queue collaborator.
///
/// Each queue URL gets its own script of receive outcomes; once a script is
/// exhausted further receives behave like an empty long poll (short sleep,
/// no messages). Handlers share the event log through
/// [`FakeQueue::record_handle`] so ordering across receive/handle/delete is
/// assertable.
pub struct FakeQueue {
    scripts: Mutex<HashMap<String, VecDeque<ReceiveStep>>>,
    log: Mutex<Vec<Event>>,
    receive_times: Mutex<Vec<Instant>>,
    idle_poll: Duration,
}

impl FakeQueue {
    pub fn new() -> Self {
        FakeQueue {
            scripts: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
            receive_times: Mutex::new(Vec::new()),
            idle_poll: Duration::from_millis(20),
        }
    }

    pub fn script(&self, queue_url: &str, steps: Vec<ReceiveStep>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(queue_url.to_string(), steps.into());
    }

    pub fn record_handle(&self, message_id: &str) {
        self.log
            .lock()
            .unwrap()
            .push(Event::Handle(message_id.to_string()));
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Delete(receipt_handle) => Some(receipt_handle),
                _ => None,
            })
            .collect()
    }

    pub fn handles(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Handle(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn receive_count(&self, queue_url: &str) -> usize {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Receive(q) if q == queue_url))
            .count()
    }

    pub fn receive_times(&self) -> Vec<Instant> {
        self.receive_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueClient for FakeQueue {
    async fn receive(
        &self,
        queue_url: &str,
        _max_messages: i32,
        _wait_time_seconds: i32,
        _visibility_timeout_seconds: i32,
    ) -> Result<Vec<Message>, QueueError> {
        self.receive_times.lock().unwrap().push(Instant::now());
        self.log
            .lock()
            .unwrap()
            .push(Event::Receive(queue_url.to_string()));

        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(queue_url)
            .and_then(|steps| steps.pop_front());

        match step {
            Some(ReceiveStep::Messages(messages)) => Ok(messages),
            Some(ReceiveStep::Error(e)) => Err(QueueError::Receive(e.to_string())),
            Some(ReceiveStep::Delay(duration, messages)) => {
                tokio::time::sleep(duration).await;
                Ok(messages)
            }
            None => {
                tokio::time::sleep(self.idle_poll).await;
                Ok(Vec::new())
            }
        }
    }

    async fn delete(&self, _queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        self.log
            .lock()
            .unwrap()
            .push(Event::Delete(receipt_handle.to_string()));
        Ok(())
    }
}

/// Handler that records the delivery and succeeds.
pub struct RecordingHandler(pub Arc<FakeQueue>);

#[async_trait]
impl products_api::handler::MessageHandler for RecordingHandler {
    async fn handle(&self, message: &Message) -> Result<(), products_api::errors::HandlerError> {
        self.0.record_handle(&message.id);
        Ok(())
    }
}

/// A test message whose receipt handle is derived from its id.
pub fn message(id: &str) -> Message {
    Message {
        id: id.to_string(),
        receipt_handle: format!("rh-{id}"),
        body: format!("body of {id}"),
    }
}

/// Processor config with test-sized timings.
pub fn fast_config() -> ProcessorConfig {
    ProcessorConfig {
        max_messages: 10,
        wait_time_seconds: 0,
        visibility_timeout_seconds: 5,
        error_backoff: Duration::from_millis(150),
    }
}

/// Polls `condition` until it holds or `deadline` passes.
pub async fn wait_until<F>(deadline: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let end = Instant::now() + deadline;
    while Instant::now() < end {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
