//! The capability boundary between navigation logic and the browser.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::locator::Locator;

/// Errors surfaced by a [`BrowserSession`] backend.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No element matched the locator before the deadline.
    #[error("no element matched {locator} within {waited_ms} ms")]
    WaitTimeout { locator: String, waited_ms: u64 },

    /// The locator matched nothing at the time of the call.
    #[error("no element currently matches {locator}")]
    NotFound { locator: String },

    /// The element disappeared between lookup and use.
    #[error("stale element handle: {0}")]
    Stale(String),

    /// The backend does not implement this capability.
    #[error("{operation} is not supported by this session")]
    Unsupported { operation: &'static str },

    /// Script arguments or results could not be marshalled.
    #[error("script error: {0}")]
    Script(String),

    #[error("webdriver session could not be established: {0}")]
    Connect(#[from] fantoccini::error::NewSessionError),

    #[error("webdriver command failed: {0}")]
    Webdriver(#[from] fantoccini::error::CmdError),
}

/// A handle to one element found in the page.
///
/// Handles are transient: the page may rerender at any time, and a
/// stale handle simply fails on its next call.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    async fn click(&self) -> Result<(), SessionError>;

    async fn clear(&self) -> Result<(), SessionError>;

    async fn send_keys(&self, text: &str) -> Result<(), SessionError>;

    async fn text(&self) -> Result<String, SessionError>;

    /// Click with whatever nudging the backend offers, such as scrolling
    /// the element into view or scripting the click when the native one
    /// is intercepted. Defaults to a plain [`ElementHandle::click`].
    async fn click_with_recovery(&self) -> Result<(), SessionError> {
        self.click().await
    }
}

impl std::fmt::Debug for dyn ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ElementHandle")
    }
}

/// An element handle as returned by session queries.
pub type Candidate = Box<dyn ElementHandle>;

/// Everything the funnel needs from a browser.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), SessionError>;

    async fn current_url(&self) -> Result<String, SessionError>;

    /// First element matching `locator`, failing when nothing matches.
    async fn find_element(&self, locator: &Locator) -> Result<Candidate, SessionError>;

    /// Every element currently matching `locator`. Absent is an empty
    /// vec, not an error.
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Candidate>, SessionError>;

    /// Blocks until `locator` matches, up to `timeout`.
    async fn wait_for_element(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Candidate, SessionError>;

    /// Runs a script in the page and returns its JSON result.
    async fn execute(&self, script: &str) -> Result<serde_json::Value, SessionError>;

    async fn sleep(&self, pause: Duration) {
        tokio::time::sleep(pause).await;
    }

    /// PNG capture of the current viewport. Optional capability.
    async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        Err(SessionError::Unsupported {
            operation: "screenshot",
        })
    }
}
