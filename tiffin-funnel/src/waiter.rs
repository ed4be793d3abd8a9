//! Deadline-bounded polling for page conditions.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use tiffin_session::BrowserSession;

use crate::condition::PageCondition;
use crate::error::FunnelError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Polls a [`PageCondition`] until it holds or a deadline passes.
pub struct ConditionWaiter<'s, S> {
    session: &'s S,
    poll_interval: Duration,
}

impl<'s, S: BrowserSession> ConditionWaiter<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self {
            session,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the pause between evaluations.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Evaluates immediately, then keeps polling. Session errors during
    /// an evaluation count as "not yet"; a page mid-navigation answers
    /// routine queries with errors without being failed. Returns
    /// [`FunnelError::Timeout`] once `timeout` has elapsed.
    pub async fn wait_for(
        &self,
        condition: &PageCondition,
        timeout: Duration,
    ) -> Result<(), FunnelError> {
        let started = Instant::now();
        loop {
            match condition.holds(self.session).await {
                Ok(true) => {
                    debug!(%condition, waited_ms = started.elapsed().as_millis() as u64, "waiter.satisfied");
                    return Ok(());
                }
                Ok(false) => {}
                Err(err) => {
                    debug!(%condition, error = %err, "waiter.poll_error");
                }
            }
            if started.elapsed() >= timeout {
                return Err(FunnelError::Timeout {
                    condition: condition.to_string(),
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
