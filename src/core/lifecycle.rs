//! # Worker lifecycle state machine.
//!
//! Applies one [`RuntimeEvent`] to a [`WorkerRecord`]. Pure: no I/O, no callbacks,
//! no locking. The relay calls it inside the registry's critical section.
//!
//! ## Transitions
//! ```text
//! online        NotStarted → Started            running = true
//! error         any        → Error              error = text
//! messageerror  any        → MessageError       error = text
//! message       (status unchanged)              last_message, actions += envelope.action
//! exit          Started    → Done               running = false, exit_code, end_time
//!               other      → (unchanged)
//! ```
//!
//! ## Rules
//! - Status never returns to `NotStarted`.
//! - A failed status is never replaced by `Started` or `Done`.
//! - `actions` only grows.

use std::time::SystemTime;

use crate::core::record::{WorkerRecord, WorkerStatus};
use crate::events::{Envelope, RuntimeEvent};

impl WorkerRecord {
    /// Applies `event`, observed at `now`, to this record.
    pub(crate) fn apply(&mut self, event: &RuntimeEvent, now: SystemTime) {
        match event {
            RuntimeEvent::Online => {
                self.running = true;
                if self.status == WorkerStatus::NotStarted {
                    self.status = WorkerStatus::Started;
                }
            }
            RuntimeEvent::Error(err) => {
                self.status = WorkerStatus::Error;
                self.error = Some(err.to_string());
            }
            RuntimeEvent::MessageError(err) => {
                self.status = WorkerStatus::MessageError;
                self.error = Some(err.to_string());
            }
            RuntimeEvent::Message(payload) => {
                if let Some(action) = Envelope::from_payload(payload).action {
                    self.actions.push(action);
                }
                self.last_message = Some(payload.clone());
            }
            RuntimeEvent::Exit(code) => {
                if self.status == WorkerStatus::Started {
                    self.status = WorkerStatus::Done;
                }
                self.running = false;
                self.exit_code = Some(*code);
                self.end_time = Some(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::WorkError;
    use crate::runtime::WorkerId;

    fn record() -> WorkerRecord {
        WorkerRecord::new(WorkerId::new(1), SystemTime::now())
    }

    fn run(events: &[RuntimeEvent]) -> WorkerRecord {
        let mut r = record();
        for ev in events {
            r.apply(ev, SystemTime::now());
        }
        r
    }

    #[test]
    fn online_then_exit_is_done() {
        let r = run(&[RuntimeEvent::Online, RuntimeEvent::Exit(0)]);
        assert_eq!(r.status, WorkerStatus::Done);
        assert!(!r.running);
        assert_eq!(r.exit_code, Some(0));
        assert!(r.end_time.is_some());
    }

    #[test]
    fn online_marks_running() {
        let r = run(&[RuntimeEvent::Online]);
        assert_eq!(r.status, WorkerStatus::Started);
        assert!(r.running);
        assert!(r.end_time.is_none());
    }

    #[test]
    fn error_survives_exit() {
        let r = run(&[
            RuntimeEvent::Online,
            RuntimeEvent::Error(WorkError::fail("Ahh!")),
            RuntimeEvent::Exit(1),
        ]);
        assert_eq!(r.status, WorkerStatus::Error);
        assert_eq!(r.error.as_deref(), Some("worker failed: Ahh!"));
        assert_eq!(r.exit_code, Some(1));
        assert!(!r.running);
    }

    #[test]
    fn message_error_survives_exit_and_later_messages() {
        let r = run(&[
            RuntimeEvent::Online,
            RuntimeEvent::MessageError(WorkError::Message {
                error: "bad".into(),
            }),
            RuntimeEvent::Message(json!("still here")),
            RuntimeEvent::Exit(0),
        ]);
        assert_eq!(r.status, WorkerStatus::MessageError);
        assert_eq!(r.last_message, Some(json!("still here")));
        assert_eq!(r.exit_code, Some(0));
    }

    #[test]
    fn error_overrides_message_error() {
        let r = run(&[
            RuntimeEvent::Online,
            RuntimeEvent::MessageError(WorkError::Message {
                error: "bad".into(),
            }),
            RuntimeEvent::Error(WorkError::fail("worse")),
        ]);
        assert_eq!(r.status, WorkerStatus::Error);
        assert_eq!(r.error.as_deref(), Some("worker failed: worse"));
    }

    #[test]
    fn online_after_failure_keeps_failed_status() {
        let r = run(&[
            RuntimeEvent::Error(WorkError::fail("early")),
            RuntimeEvent::Online,
        ]);
        assert_eq!(r.status, WorkerStatus::Error);
    }

    #[test]
    fn exit_without_online_stays_not_started() {
        let r = run(&[RuntimeEvent::Exit(1)]);
        assert_eq!(r.status, WorkerStatus::NotStarted);
        assert_eq!(r.exit_code, Some(1));
    }

    #[test]
    fn messages_collect_actions_in_order() {
        let r = run(&[
            RuntimeEvent::Online,
            RuntimeEvent::Message(json!({ "action": "first" })),
            RuntimeEvent::Message(json!("no action here")),
            RuntimeEvent::Message(json!({ "msg": "second" })),
            RuntimeEvent::Message(json!({ "action": "third", "msg": "hello" })),
        ]);
        assert_eq!(
            r.actions,
            vec!["first".to_string(), "second".to_string(), "third".to_string()]
        );
        assert_eq!(r.last_message, Some(json!({ "action": "third", "msg": "hello" })));
        assert_eq!(r.status, WorkerStatus::Started);
    }
}
