//! A bounded check-act-recheck loop.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Alternates a check with a recovery action, at most `max_attempts`
/// actions. The check runs first, so an immediate hit costs zero
/// actions, and it runs once more after the final action, giving
/// `max_attempts + 1` evaluations in the worst case. `Ok(None)` means
/// the budget ran out with the check still unsatisfied; an error from
/// either closure ends the loop at once.
///
/// ```
/// # use std::time::Duration;
/// # use tiffin_funnel::bounded_retry;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use std::cell::Cell;
///
/// let polls = Cell::new(0u32);
/// let outcome: Result<Option<u32>, &str> = bounded_retry(
///     || {
///         let polls = &polls;
///         async move {
///             polls.set(polls.get() + 1);
///             Ok(if polls.get() >= 3 { Some(polls.get()) } else { None })
///         }
///     },
///     || async { Ok(()) },
///     8,
///     Duration::from_millis(1),
/// )
/// .await;
/// assert_eq!(outcome, Ok(Some(3)));
/// # }
/// ```
pub async fn bounded_retry<T, E, C, CF, A, AF>(
    mut check: C,
    mut action: A,
    max_attempts: u32,
    interval: Duration,
) -> Result<Option<T>, E>
where
    C: FnMut() -> CF,
    CF: Future<Output = Result<Option<T>, E>>,
    A: FnMut() -> AF,
    AF: Future<Output = Result<(), E>>,
{
    let mut attempt = 0u32;
    loop {
        if let Some(hit) = check().await? {
            return Ok(Some(hit));
        }
        if attempt >= max_attempts {
            debug!(max_attempts, "retry.exhausted");
            return Ok(None);
        }
        attempt += 1;
        debug!(attempt, max_attempts, "retry.step");
        action().await?;
        tokio::time::sleep(interval).await;
    }
}
