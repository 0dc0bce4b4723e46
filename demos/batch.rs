//! # Example: batch
//!
//! Runs a small batch of workers under one [`WorkerManager`] and polls their records.
//!
//! Demonstrates how to:
//! - Define worker bodies with [`WorkFn`].
//! - Pass worker data in and read posted messages and actions back.
//! - React to errors and exits through callbacks.
//! - Acknowledge finished workers so the reaper evicts them.
//!
//! ## Flow
//! ```text
//! WorkerManager::create(options) ──► TokioRuntime::spawn
//!     ├─► online         ──► on_online
//!     ├─► message*       ──► last_message / actions ──► on_message
//!     ├─► error          ──► stderr diagnostic ──► on_error ──► terminate
//!     └─► exit(code)     ──► on_exit ──► handle.acknowledge()
//!
//! Reaper (every 200ms) ──► evicts acknowledged, stopped workers
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=workvisor=debug cargo run --example batch
//! ```

use std::time::Duration;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use workvisor::{
    Envelope, ManagerConfig, RunFile, WorkError, WorkFn, WorkerContext, WorkerManager,
    WorkerOptions,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Manager with a short reaper interval
    let cfg = ManagerConfig::default()
        .with_clean_interval(Duration::from_millis(200))
        .with_timeout(Duration::from_secs(5));
    let manager = WorkerManager::new(cfg);

    // 3. Worker bodies
    let counter: RunFile = WorkFn::arc("counter", |ctx: WorkerContext| async move {
        let steps = ctx
            .worker_data()
            .and_then(|d| d.get("steps"))
            .and_then(|s| s.as_u64())
            .unwrap_or(3);
        for i in 1..=steps {
            if ctx.is_cancelled() {
                return Ok(());
            }
            ctx.post_message(&json!({ "action": format!("step-{i}"), "of": steps }))?;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        ctx.post_message(&Envelope::with_action("finished"))?;
        Ok::<_, WorkError>(())
    });

    let flaky: RunFile = WorkFn::arc("flaky", |ctx: WorkerContext| async move {
        ctx.post_message("warming up")?;
        tokio::time::sleep(Duration::from_millis(150)).await;
        Err::<(), _>(WorkError::fail("disk full"))
    });

    // 4. Spawn the batch
    for steps in [2, 4] {
        manager.create(
            WorkerOptions::new(counter.clone())
                .worker_data(json!({ "steps": steps }))
                .on_online(|h| println!("[{}] online", h.id()))
                .on_message(|msg, h| println!("[{}] message {msg}", h.id()))
                .on_exit(|code, h| {
                    println!("[{}] exited with {code}", h.id());
                    h.acknowledge();
                }),
        )?;
    }

    let flaky_handle = manager.create(
        WorkerOptions::new(flaky)
            .on_error(|err, h| println!("[{}] failed: {err}", h.id()))
            .on_exit(|code, h| println!("[{}] exited with {code}", h.id())),
    )?;

    // 5. Watch the records until the counters are reaped
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(150)).await;
        for record in manager.list() {
            println!(
                "  worker {} status={} actions={:?}",
                record.id, record.status, record.actions
            );
        }
        if manager.len() == 1 {
            break;
        }
    }

    // 6. The failed worker stays until it is acknowledged or expires
    if let Some(record) = manager.get(flaky_handle.id()) {
        println!("flaky kept: status={} error={:?}", record.status, record.error);
    }
    flaky_handle.acknowledge();
    tokio::time::sleep(Duration::from_millis(300)).await;
    println!("remaining workers: {}", manager.len());

    manager.shutdown();
    Ok(())
}
