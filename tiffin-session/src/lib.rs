//! Browser sessions behind a narrow capability trait.
//!
//! # Overview
//!
//! - [`Locator`]: a typed selector, either CSS or XPath. Selector text
//!   is data; which query the driver runs is decided in one place.
//! - [`BrowserSession`] / [`ElementHandle`]: the seam between the
//!   navigation logic and the browser. Production code talks to a
//!   real WebDriver endpoint through [`WebDriverSession`]; tests plug
//!   in scripted fakes.
//!
//! Element handles are transient by design. A single-page app may
//! rerender at any moment, so a handle that worked a moment ago can
//! fail on its next call, and callers are expected to re-query rather
//! than cache.

pub mod driver;
pub mod locator;
pub mod session;

pub use driver::{WebDriverElement, WebDriverSession};
pub use locator::Locator;
pub use session::{BrowserSession, Candidate, ElementHandle, SessionError};
