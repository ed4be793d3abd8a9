//! First-match element resolution over ordered strategies.

use std::time::Duration;

use tracing::{debug, warn};

use tiffin_session::{BrowserSession, Candidate, SessionError};

use crate::error::FunnelError;
use crate::strategy::StrategySet;

/// Resolves a target by trying its strategies in order.
pub struct ElementResolver<'s, S> {
    session: &'s S,
}

impl<'s, S: BrowserSession> ElementResolver<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self { session }
    }

    /// Tries each strategy for up to `per_strategy_timeout`, returning
    /// the first element found. Later strategies are not evaluated once
    /// one hits; exhausting the set is [`FunnelError::NotFound`].
    pub async fn resolve(
        &self,
        target: &StrategySet,
        per_strategy_timeout: Duration,
    ) -> Result<Candidate, FunnelError> {
        for (index, locator) in target.strategies().iter().enumerate() {
            match self
                .session
                .wait_for_element(locator, per_strategy_timeout)
                .await
            {
                Ok(found) => {
                    debug!(label = %target.label(), strategy = index, %locator, "resolver.hit");
                    return Ok(found);
                }
                Err(SessionError::WaitTimeout { waited_ms, .. }) => {
                    debug!(label = %target.label(), strategy = index, %locator, waited_ms, "resolver.miss");
                }
                // Driver errors on one strategy do not end the chain.
                Err(err) => {
                    warn!(label = %target.label(), strategy = index, %locator, error = %err, "resolver.strategy_error");
                }
            }
        }
        Err(FunnelError::NotFound {
            target: target.label().to_string(),
        })
    }

    /// A single non-waiting probe, for targets that are allowed to be
    /// absent. Backend errors count as absent and are logged.
    pub async fn peek(&self, target: &StrategySet) -> Option<Candidate> {
        for locator in target.strategies() {
            match self.session.find_elements(locator).await {
                Ok(mut found) if !found.is_empty() => {
                    debug!(label = %target.label(), %locator, "resolver.peek_hit");
                    return Some(found.remove(0));
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(label = %target.label(), %locator, error = %err, "resolver.peek_error");
                }
            }
        }
        None
    }
}
