use std::time::Duration;

/// Configuration for one queue processor.
///
/// This struct defines the parameters for receiving messages from a queue,
/// including the batch size, the long-poll wait and the visibility timeout.
///
/// The visibility timeout must exceed the expected handler execution time for
/// a full batch; otherwise a message can become visible to another receiver
/// while still being handled here. That risk is documented, not eliminated.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// The maximum number of messages to receive in a single request.
    pub max_messages: i32,

    /// The wait time for long polling, in seconds.
    pub wait_time_seconds: i32,

    /// How long received messages stay hidden from other receivers, in seconds.
    pub visibility_timeout_seconds: i32,

    /// Fixed sleep after a failed receive before polling again.
    ///
    /// Deliberately not exponential and without a retry cap: the processor is
    /// a long-running worker and must keep trying for as long as it lives.
    pub error_backoff: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            max_messages: 10,
            wait_time_seconds: 20,
            visibility_timeout_seconds: 30,
            error_backoff: Duration::from_secs(5),
        }
    }
}
