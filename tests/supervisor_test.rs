use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{Instant, timeout};

use products_api::errors::SupervisorError;
use products_api::processor::ProcessorStatus;
use products_api::supervisor::ProcessorSupervisor;

mod common;

use common::{FakeQueue, ReceiveStep, RecordingHandler, fast_config, message, wait_until};

const QUEUE_A: &str = "https://sqs.us-east-1.amazonaws.com/000000000000/queue-a";
const QUEUE_B: &str = "https://sqs.us-east-1.amazonaws.com/000000000000/queue-b";

#[tokio::test]
async fn registration_is_rejected_after_start() {
    let queue = Arc::new(FakeQueue::new());
    let mut supervisor = ProcessorSupervisor::new(Arc::clone(&queue));

    supervisor
        .register(QUEUE_A, RecordingHandler(Arc::clone(&queue)), Some(fast_config()))
        .unwrap();
    supervisor.start().unwrap();

    let late = supervisor.register(QUEUE_B, RecordingHandler(Arc::clone(&queue)), Some(fast_config()));
    assert!(matches!(late, Err(SupervisorError::AlreadyStarted)));
    assert!(matches!(
        supervisor.start(),
        Err(SupervisorError::AlreadyStarted)
    ));

    timeout(Duration::from_secs(2), supervisor.stop())
        .await
        .expect("stop timed out");
}

#[tokio::test]
async fn stop_is_blocking_exhaustive_and_idempotent() {
    let queue = Arc::new(FakeQueue::new());
    let mut supervisor = ProcessorSupervisor::new(Arc::clone(&queue));

    supervisor
        .register(QUEUE_A, RecordingHandler(Arc::clone(&queue)), Some(fast_config()))
        .unwrap();
    supervisor
        .register(QUEUE_B, RecordingHandler(Arc::clone(&queue)), Some(fast_config()))
        .unwrap();
    supervisor.start().unwrap();

    timeout(Duration::from_secs(2), supervisor.stop())
        .await
        .expect("stop timed out");
    assert!(
        supervisor
            .statuses()
            .iter()
            .all(|(_, status)| *status == ProcessorStatus::Stopped)
    );

    // A second stop has nothing left to wait for.
    let again = Instant::now();
    timeout(Duration::from_secs(1), supervisor.stop())
        .await
        .expect("second stop timed out");
    assert!(again.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn stop_before_start_returns_immediately() {
    let queue = Arc::new(FakeQueue::new());
    let supervisor: ProcessorSupervisor<FakeQueue> = ProcessorSupervisor::new(queue);

    timeout(Duration::from_secs(1), supervisor.stop())
        .await
        .expect("stop timed out");
}

#[tokio::test]
async fn statuses_traverse_the_lifecycle() {
    let queue = Arc::new(FakeQueue::new());
    let mut supervisor = ProcessorSupervisor::new(Arc::clone(&queue));

    supervisor
        .register(QUEUE_A, RecordingHandler(Arc::clone(&queue)), Some(fast_config()))
        .unwrap();
    assert_eq!(
        supervisor.statuses(),
        vec![(QUEUE_A.to_string(), ProcessorStatus::Registered)]
    );

    supervisor.start().unwrap();
    assert_eq!(
        supervisor.statuses(),
        vec![(QUEUE_A.to_string(), ProcessorStatus::Running)]
    );

    timeout(Duration::from_secs(2), supervisor.stop())
        .await
        .expect("stop timed out");
    assert_eq!(
        supervisor.statuses(),
        vec![(QUEUE_A.to_string(), ProcessorStatus::Stopped)]
    );
}

#[tokio::test]
async fn duplicate_registrations_for_one_queue_run_independently() {
    let queue = Arc::new(FakeQueue::new());
    let mut supervisor = ProcessorSupervisor::new(Arc::clone(&queue));

    supervisor
        .register(QUEUE_A, RecordingHandler(Arc::clone(&queue)), Some(fast_config()))
        .unwrap();
    supervisor
        .register(QUEUE_A, RecordingHandler(Arc::clone(&queue)), Some(fast_config()))
        .unwrap();
    supervisor.start().unwrap();

    // Both loops poll the same endpoint.
    assert!(wait_until(Duration::from_secs(2), || queue.receive_count(QUEUE_A) >= 4).await);

    timeout(Duration::from_secs(2), supervisor.stop())
        .await
        .expect("stop timed out");
    assert_eq!(supervisor.statuses().len(), 2);
    assert!(
        supervisor
            .statuses()
            .iter()
            .all(|(_, status)| *status == ProcessorStatus::Stopped)
    );
}

#[tokio::test]
async fn blocked_handler_on_one_queue_never_stalls_another() {
    let queue = Arc::new(FakeQueue::new());
    queue.script(QUEUE_A, vec![ReceiveStep::Messages(vec![message("a-1")])]);
    queue.script(
        QUEUE_B,
        vec![
            ReceiveStep::Messages(vec![message("b-1")]),
            ReceiveStep::Messages(vec![message("b-2")]),
            ReceiveStep::Messages(vec![message("b-3")]),
        ],
    );

    let gate = Arc::new(Notify::new());

    let mut supervisor = ProcessorSupervisor::new(Arc::clone(&queue));
    let q = Arc::clone(&queue);
    let blocked = Arc::clone(&gate);
    supervisor
        .register_fn(
            QUEUE_A,
            move |message| {
                let q = Arc::clone(&q);
                let blocked = Arc::clone(&blocked);
                async move {
                    q.record_handle(&message.id);
                    blocked.notified().await;
                    Ok(())
                }
            },
            Some(fast_config()),
        )
        .unwrap();
    supervisor
        .register(QUEUE_B, RecordingHandler(Arc::clone(&queue)), Some(fast_config()))
        .unwrap();
    supervisor.start().unwrap();

    // B drains its whole script while A's handler is parked.
    assert!(
        wait_until(Duration::from_secs(2), || {
            queue.deletes().contains(&"rh-b-3".to_string())
        })
        .await
    );
    assert!(queue.handles().contains(&"a-1".to_string()));
    assert!(!queue.deletes().contains(&"rh-a-1".to_string()));

    // Release A and shut down; its message completes and is acknowledged.
    gate.notify_one();
    assert!(
        wait_until(Duration::from_secs(2), || {
            queue.deletes().contains(&"rh-a-1".to_string())
        })
        .await
    );
    timeout(Duration::from_secs(2), supervisor.stop())
        .await
        .expect("stop timed out");
}
