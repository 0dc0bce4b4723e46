mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;
use workvisor::{
    BufferWriter, Envelope, ManagerConfig, RunFile, SpawnError, TokioRuntime, WorkError, WorkFn,
    WorkerContext, WorkerManager, WorkerOptions, WorkerRuntime, WorkerStatus,
};

use common::{Calls, wait_until};

fn manager_with(cfg: ManagerConfig) -> (WorkerManager, BufferWriter) {
    let sink = BufferWriter::new();
    let manager = WorkerManager::builder(cfg)
        .with_diagnostics(Arc::new(sink.clone()))
        .build();
    (manager, sink)
}

fn manager() -> (WorkerManager, BufferWriter) {
    manager_with(ManagerConfig::default())
}

/// Posts "started", naps for ~250ms, then posts "done".
fn sleepy() -> RunFile {
    WorkFn::arc("sleepy", |ctx: WorkerContext| async move {
        ctx.post_message("started")?;
        for _ in 0..25 {
            sleep(Duration::from_millis(10)).await;
        }
        ctx.post_message("done")?;
        Ok::<_, WorkError>(())
    })
}

/// Posts its worker data back, then exits.
fn chatty_reflect() -> RunFile {
    WorkFn::arc("chatty-reflect", |ctx: WorkerContext| async move {
        sleep(Duration::from_millis(10)).await;
        if let Some(data) = ctx.worker_data() {
            ctx.post_message(data)?;
        }
        sleep(Duration::from_millis(10)).await;
        Ok::<_, WorkError>(())
    })
}

fn failing() -> RunFile {
    WorkFn::arc("failing", |_ctx: WorkerContext| async move {
        Err::<(), _>(WorkError::fail("Ahh!"))
    })
}

#[tokio::test]
async fn test_kills_workers_exceeding_the_timeout() {
    let cfg = ManagerConfig::default()
        .with_clean_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_millis(5));
    let (manager, _) = manager_with(cfg);
    let messages = Calls::<serde_json::Value>::new();

    let id = manager
        .create(WorkerOptions::new(sleepy()).on_message({
            let messages = messages.clone();
            move |payload, _| messages.push(payload.clone())
        }))
        .unwrap()
        .id();

    sleep(Duration::from_millis(500)).await;

    assert_eq!(messages.all().last(), Some(&json!("started")));
    assert!(manager.get(id).is_none());
}

#[tokio::test]
async fn test_worker_error_sets_status_and_reports() {
    let (manager, sink) = manager();
    let errors = Calls::<WorkError>::new();

    let id = manager
        .create(WorkerOptions::new(failing()).on_error({
            let errors = errors.clone();
            move |err, _| errors.push(err.clone())
        }))
        .unwrap()
        .id();

    sleep(Duration::from_millis(100)).await;

    assert_eq!(manager.get_status(id), Some(WorkerStatus::Error));
    assert_eq!(errors.all(), vec![WorkError::fail("Ahh!")]);
    assert!(sink.contents().contains("Ahh!"));

    let record = manager.get(id).unwrap();
    assert_eq!(record.exit_code, Some(1));
    assert!(!record.running);
}

#[tokio::test]
async fn test_panicking_worker_is_reported_as_error() {
    let (manager, sink) = manager();
    let work: RunFile = WorkFn::arc("panicky", |ctx: WorkerContext| async move {
        if ctx.worker_data().is_none() {
            panic!("kaboom");
        }
        Ok::<_, WorkError>(())
    });

    let id = manager.create(WorkerOptions::new(work)).unwrap().id();

    assert!(wait_until(Duration::from_secs(1), || manager.get(id).is_some_and(|r| r.exit_code.is_some())).await);
    let record = manager.get(id).unwrap();
    assert_eq!(record.status, WorkerStatus::Error);
    assert_eq!(record.error.as_deref(), Some("worker panicked: kaboom"));
    assert_eq!(record.exit_code, Some(1));
    assert!(sink.contents().contains("kaboom"));
}

#[tokio::test]
async fn test_gathers_actions_and_exit_code() {
    let (manager, _) = manager();
    let exits = Calls::<i32>::new();

    let id = manager
        .create(
            WorkerOptions::new(chatty_reflect())
                .worker_data(json!({ "action": "do it!" }))
                .on_exit({
                    let exits = exits.clone();
                    move |code, _| exits.push(code)
                }),
        )
        .unwrap()
        .id();

    assert!(wait_until(Duration::from_secs(1), || manager.get_status(id) == Some(WorkerStatus::Done)).await);
    let record = manager.get(id).unwrap();
    assert_eq!(record.actions, vec!["do it!".to_string()]);
    assert_eq!(record.exit_code, Some(0));
    assert!(record.end_time.is_some());
    assert!(wait_until(Duration::from_secs(1), || exits.count() == 1).await);
    assert_eq!(exits.all(), vec![0]);
}

#[tokio::test]
async fn test_last_message_reflects_worker_data() {
    let (manager, _) = manager();
    let id = manager
        .create(WorkerOptions::new(chatty_reflect()).worker_data("hi!"))
        .unwrap()
        .id();

    assert!(wait_until(Duration::from_secs(1), || manager.get_status(id) == Some(WorkerStatus::Done)).await);
    assert_eq!(manager.get_last_message(id), Some(json!("hi!")));
    assert!(manager.get(id).unwrap().actions.is_empty());
}

#[tokio::test]
async fn test_on_online_fires_after_create_returns() {
    let (manager, _) = manager();
    let online = Calls::<()>::new();

    manager
        .create(
            WorkerOptions::new(chatty_reflect())
                .worker_data("online")
                .on_online({
                    let online = online.clone();
                    move |_| online.push(())
                }),
        )
        .unwrap();

    assert_eq!(online.count(), 0);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(online.count(), 1);
}

#[tokio::test]
async fn test_list_includes_created_worker() {
    let (manager, _) = manager();
    let id = manager
        .create(WorkerOptions::new(chatty_reflect()).worker_data("hi"))
        .unwrap()
        .id();

    assert!(manager.list().iter().any(|r| r.id == id));
}

#[tokio::test]
async fn test_self_acknowledged_worker_is_reaped_after_finishing() {
    let cfg = ManagerConfig::default().with_clean_interval(Duration::from_millis(100));
    let (manager, _) = manager_with(cfg);

    let handle = manager
        .create(WorkerOptions::new(chatty_reflect()).worker_data("ack"))
        .unwrap();
    handle.acknowledge();
    assert_eq!(manager.get(handle.id()).map(|r| r.acknowledged), Some(true));

    assert!(wait_until(Duration::from_secs(1), || manager.get(handle.id()).is_none()).await);
}

#[tokio::test]
async fn test_terminate_stops_a_running_worker() {
    let (manager, _) = manager();
    let work: RunFile = WorkFn::arc("forever", |_ctx: WorkerContext| async move {
        std::future::pending::<()>().await;
        Ok::<_, WorkError>(())
    });
    let handle = manager.create(WorkerOptions::new(work)).unwrap();
    let id = handle.id();
    assert!(wait_until(Duration::from_secs(1), || manager.get(id).is_some_and(|r| r.running)).await);

    handle.terminate();

    assert!(wait_until(Duration::from_secs(1), || manager.get(id).is_some_and(|r| !r.running)).await);
    let record = manager.get(id).unwrap();
    assert_eq!(record.exit_code, Some(1));
    assert_eq!(record.status, WorkerStatus::Done);
}

#[tokio::test]
async fn test_unserializable_message_is_non_fatal() {
    let (manager, sink) = manager();
    let message_errors = Calls::<String>::new();
    let work: RunFile = WorkFn::arc("bad-poster", |ctx: WorkerContext| async move {
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple keys are not JSON object keys");
        let posted = ctx.post_message(&bad);
        assert!(matches!(posted, Err(WorkError::Message { .. })));
        ctx.post_message(&Envelope::with_action("recovered"))?;
        Ok::<_, WorkError>(())
    });

    let id = manager
        .create(WorkerOptions::new(work).on_message_error({
            let message_errors = message_errors.clone();
            move |err, _| message_errors.push(err.to_string())
        }))
        .unwrap()
        .id();

    assert!(wait_until(Duration::from_secs(1), || manager.get(id).is_some_and(|r| r.exit_code.is_some())).await);
    let record = manager.get(id).unwrap();
    assert_eq!(record.status, WorkerStatus::MessageError);
    assert_eq!(record.exit_code, Some(0));
    assert_eq!(record.actions, vec!["recovered".to_string()]);
    assert_eq!(message_errors.count(), 1);
    assert!(sink.contents().contains("message could not be delivered"));
}

#[tokio::test]
async fn test_custom_exit_code() {
    let (manager, _) = manager();
    let work: RunFile = WorkFn::arc("exit-3", |ctx: WorkerContext| async move {
        ctx.set_exit_code(3);
        Ok::<_, WorkError>(())
    });

    let id = manager.create(WorkerOptions::new(work)).unwrap().id();

    assert!(wait_until(Duration::from_secs(1), || manager.get_status(id) == Some(WorkerStatus::Done)).await);
    assert_eq!(manager.get(id).unwrap().exit_code, Some(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_acknowledged_workers_drain() {
    let cfg = ManagerConfig::default().with_clean_interval(Duration::from_millis(20));
    let (manager, _) = manager_with(cfg);
    let work: RunFile = WorkFn::arc("counter", |ctx: WorkerContext| async move {
        for i in 0..5 {
            ctx.post_message(&json!({ "action": format!("step-{i}") }))?;
            tokio::task::yield_now().await;
        }
        Ok::<_, WorkError>(())
    });

    for _ in 0..20 {
        let handle = manager
            .create(WorkerOptions::new(Arc::clone(&work)).on_exit(|_, h| h.acknowledge()))
            .unwrap();
        assert!(handle.is_registered());
    }

    assert!(wait_until(Duration::from_secs(2), || manager.is_empty()).await);
}

#[test]
fn test_tokio_runtime_requires_a_runtime() {
    let work: RunFile = WorkFn::arc("noop", |_ctx: WorkerContext| async { Ok::<_, WorkError>(()) });

    let err = TokioRuntime::new().spawn(&work, None).unwrap_err();

    assert_eq!(err, SpawnError::NoRuntime);
}
