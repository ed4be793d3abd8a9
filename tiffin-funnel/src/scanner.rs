//! Text search over a lazily rendered listing.

use std::time::Duration;

use tracing::debug;

use tiffin_session::{BrowserSession, Candidate, Locator};

use crate::error::FunnelError;
use crate::retry::bounded_retry;

/// Finds an entry by visible text in a listing that only renders rows
/// near the viewport, scrolling in bounded steps between scans.
pub struct LazyListScanner<'s, S> {
    session: &'s S,
    scroll_step_px: u32,
    render_pause: Duration,
}

impl<'s, S: BrowserSession> LazyListScanner<'s, S> {
    pub fn new(session: &'s S, scroll_step_px: u32, render_pause: Duration) -> Self {
        Self {
            session,
            scroll_step_px,
            render_pause,
        }
    }

    /// Case-insensitive containment search across the candidate
    /// selectors. Scans whatever is rendered first; on a miss, scrolls
    /// one step, pauses for `render_pause`, and rescans, up to
    /// `max_attempts` scrolls. Once the budget runs out, a single
    /// fallback pass looks for any link whose text contains the target.
    ///
    /// `Ok(None)` is "genuinely not found"; the caller decides how
    /// severe that is.
    pub async fn find_by_text(
        &self,
        candidates: &[Locator],
        target_text: &str,
        max_attempts: u32,
    ) -> Result<Option<Candidate>, FunnelError> {
        let needle = target_text.to_lowercase();
        let session = self.session;
        let scroll_script = format!(
            "window.scrollBy(0, Math.min({}, document.body.scrollHeight));",
            self.scroll_step_px
        );

        let scanned = bounded_retry(
            || scan_rendered(session, candidates, &needle),
            || scroll_step(session, &scroll_script),
            max_attempts,
            self.render_pause,
        )
        .await?;
        if scanned.is_some() {
            return Ok(scanned);
        }

        debug!(needle = %needle, "scanner.fallback_links");
        let anchors = Locator::css("a");
        scan_rendered(session, std::slice::from_ref(&anchors), &needle).await
    }
}

/// One pass over everything currently rendered. Candidates whose text
/// cannot be read (stale or detached mid-render) are skipped.
async fn scan_rendered<S: BrowserSession>(
    session: &S,
    candidates: &[Locator],
    needle: &str,
) -> Result<Option<Candidate>, FunnelError> {
    for locator in candidates {
        let rendered = session.find_elements(locator).await?;
        for candidate in rendered {
            match candidate.text().await {
                Ok(text) => {
                    if text.to_lowercase().contains(needle) {
                        debug!(%locator, needle = %needle, "scanner.hit");
                        return Ok(Some(candidate));
                    }
                }
                Err(err) => {
                    debug!(%locator, error = %err, "scanner.candidate_unreadable");
                }
            }
        }
    }
    Ok(None)
}

async fn scroll_step<S: BrowserSession>(
    session: &S,
    script: &str,
) -> Result<(), FunnelError> {
    debug!("scanner.scroll");
    session.execute(script).await?;
    Ok(())
}
