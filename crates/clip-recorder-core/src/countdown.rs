use crate::RecorderEvent;

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, interval_at},
};
use tracing::debug;
use uuid::Uuid;

/// Countdown resolution.
pub(crate) const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Periodic tick source for one recording session.
///
/// Dropping the countdown aborts the task, so a countdown never outlives the
/// recording it belongs to.
pub(crate) struct Countdown {
    session_id: Uuid,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn a task that sends [`RecorderEvent::Tick`] every `period`, first one after `period`.
    pub(crate) fn start(
        session_id: Uuid,
        period: Duration,
        tx: mpsc::UnboundedSender<RecorderEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(RecorderEvent::Tick { session_id }).is_err() {
                    break;
                }
            }
        });

        debug!(session_id = %session_id, period_ms = period.as_millis(), "Countdown started");

        Self { session_id, handle }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(session_id = %self.session_id, "Countdown cleared");
    }
}
