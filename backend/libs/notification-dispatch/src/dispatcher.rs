//! Detached notification delivery
//!
//! Delivery runs on its own task with its own deadline. It is never tied to
//! the request that caused it, so a client disconnect cannot cancel it, and
//! its outcome is only ever logged.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use resilience::{with_timeout_result, TimeoutError};

use crate::client::{NoopNotificationSink, NotificationError, NotificationSink};
use crate::diff::{diff_board_mutation, AppliedChanges, BoardSnapshot};
use crate::event::BoardContext;

/// Everything needed to notify about one applied board update.
#[derive(Debug, Clone)]
pub struct BoardMutation {
    pub actor_id: Uuid,
    pub before: BoardSnapshot,
    pub after: BoardSnapshot,
    pub changes: AppliedChanges,
    pub context: BoardContext,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>, timeout: Duration) -> Self {
        Self { sink, timeout }
    }

    pub fn disabled() -> Self {
        Self::new(
            Arc::new(NoopNotificationSink),
            resilience::notification_config().timeout.duration,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_enabled()
    }

    /// Diff and deliver in the current task. Never fails; errors are logged.
    pub async fn notify_board_mutation(&self, mutation: &BoardMutation) {
        if !self.sink.is_enabled() {
            return;
        }

        let events = diff_board_mutation(
            mutation.actor_id,
            &mutation.before,
            &mutation.after,
            mutation.changes,
            &mutation.context,
        );
        if events.is_empty() {
            return;
        }

        let result = with_timeout_result(self.timeout, self.sink.send_bulk(&events))
            .await
            .map_err(|e| match e {
                TimeoutError::Elapsed(_) => NotificationError::Timeout,
                TimeoutError::Inner(inner) => inner,
            });

        match result {
            Ok(()) => debug!(
                board_id = %mutation.context.board_id,
                notification_count = events.len(),
                "Board updated notifications sent"
            ),
            Err(e) => warn!(
                board_id = %mutation.context.board_id,
                notification_count = events.len(),
                error = %e,
                "Failed to send board updated notifications"
            ),
        }
    }

    /// Deliver on a detached task.
    ///
    /// Call this after the response has been produced. The handle is only
    /// useful to tests; production callers drop it.
    pub fn spawn_board_mutation(&self, mutation: BoardMutation) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.notify_board_mutation(&mutation).await;
        })
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("enabled", &self.sink.is_enabled())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NotificationEvent;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        enabled: bool,
        delay: Option<Duration>,
        fail: bool,
        batches: Mutex<Vec<Vec<NotificationEvent>>>,
    }

    impl RecordingSink {
        fn enabled() -> Self {
            Self {
                enabled: true,
                ..Default::default()
            }
        }

        fn batches(&self) -> Vec<Vec<NotificationEvent>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
            self.send_bulk(std::slice::from_ref(event)).await
        }

        async fn send_bulk(&self, events: &[NotificationEvent]) -> Result<(), NotificationError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.batches.lock().unwrap().push(events.to_vec());
            if self.fail {
                Err(NotificationError::Status(500))
            } else {
                Ok(())
            }
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }
    }

    fn assignment(actor_id: Uuid, assignee: Uuid) -> BoardMutation {
        BoardMutation {
            actor_id,
            before: BoardSnapshot::default(),
            after: BoardSnapshot::new(Some(assignee), vec![]),
            changes: AppliedChanges {
                assignee: true,
                participants: false,
            },
            context: BoardContext::new(Uuid::new_v4(), Uuid::new_v4(), "Board", "Project"),
        }
    }

    #[tokio::test]
    async fn test_events_go_out_in_one_batch() {
        let sink = Arc::new(RecordingSink::enabled());
        let dispatcher = NotificationDispatcher::new(sink.clone(), Duration::from_secs(5));
        let (b, c) = (Uuid::new_v4(), Uuid::new_v4());

        let mutation = BoardMutation {
            actor_id: Uuid::new_v4(),
            before: BoardSnapshot::default(),
            after: BoardSnapshot::new(Some(b), vec![b, c]),
            changes: AppliedChanges {
                assignee: true,
                participants: true,
            },
            context: BoardContext::new(Uuid::new_v4(), Uuid::new_v4(), "Board", "Project"),
        };
        dispatcher.notify_board_mutation(&mutation).await;

        let batches = sink.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_sink_is_skipped() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = NotificationDispatcher::new(sink.clone(), Duration::from_secs(5));

        dispatcher
            .notify_board_mutation(&assignment(Uuid::new_v4(), Uuid::new_v4()))
            .await;

        assert!(sink.batches().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_to_say_makes_no_call() {
        let sink = Arc::new(RecordingSink::enabled());
        let dispatcher = NotificationDispatcher::new(sink.clone(), Duration::from_secs(5));
        let actor = Uuid::new_v4();

        dispatcher.notify_board_mutation(&assignment(actor, actor)).await;

        assert!(sink.batches().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..RecordingSink::enabled()
        });
        let dispatcher = NotificationDispatcher::new(sink.clone(), Duration::from_secs(5));

        let handle =
            dispatcher.spawn_board_mutation(assignment(Uuid::new_v4(), Uuid::new_v4()));

        assert!(handle.await.is_ok());
        assert_eq!(sink.batches().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_sink_is_abandoned_at_deadline() {
        let sink = Arc::new(RecordingSink {
            delay: Some(Duration::from_secs(60)),
            ..RecordingSink::enabled()
        });
        let dispatcher = NotificationDispatcher::new(sink.clone(), Duration::from_secs(10));

        let handle =
            dispatcher.spawn_board_mutation(assignment(Uuid::new_v4(), Uuid::new_v4()));

        assert!(handle.await.is_ok());
        assert!(sink.batches().is_empty());
    }

    #[test]
    fn test_disabled_dispatcher() {
        assert!(!NotificationDispatcher::disabled().is_enabled());
    }
}
