//! Page-level conditions the waiter can poll for.

use std::fmt;

use regex::Regex;
use tiffin_session::{BrowserSession, Locator, SessionError};

/// A condition over the whole page rather than a single element.
#[derive(Debug, Clone)]
pub enum PageCondition {
    /// The current URL matches the pattern.
    UrlMatches(Regex),
    /// At least one element matches the locator.
    ElementPresent(Locator),
    /// At least one of the locators matches something.
    AnyOf(Vec<Locator>),
    /// `document.readyState` reports `complete`.
    DocumentReady,
}

impl PageCondition {
    /// One evaluation, no waiting. Backend trouble is reported as an
    /// error; the waiter decides what to make of it.
    pub async fn holds<S: BrowserSession>(&self, session: &S) -> Result<bool, SessionError> {
        match self {
            PageCondition::UrlMatches(pattern) => {
                let url = session.current_url().await?;
                Ok(pattern.is_match(&url))
            }
            PageCondition::ElementPresent(locator) => {
                Ok(!session.find_elements(locator).await?.is_empty())
            }
            PageCondition::AnyOf(locators) => {
                for locator in locators {
                    if !session.find_elements(locator).await?.is_empty() {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            PageCondition::DocumentReady => {
                let state = session.execute("return document.readyState;").await?;
                Ok(state.as_str() == Some("complete"))
            }
        }
    }
}

impl fmt::Display for PageCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageCondition::UrlMatches(pattern) => write!(f, "url matches /{pattern}/"),
            PageCondition::ElementPresent(locator) => write!(f, "element present: {locator}"),
            PageCondition::AnyOf(locators) => write!(f, "any of {} locators", locators.len()),
            PageCondition::DocumentReady => write!(f, "document ready"),
        }
    }
}
