//! Resilient element resolution and stepwise navigation for a
//! food-delivery ordering funnel.
//!
//! # Overview
//!
//! Selector-first automation against a fast-moving single-page app.
//! The crate assumes markup drift is normal and encodes every lookup
//! as an ordered list of [`Locator`](tiffin_session::Locator)
//! strategies:
//!
//! - [`ElementResolver`]: first strategy that matches wins.
//! - [`ConditionWaiter`]: polls a [`PageCondition`] under a deadline.
//! - [`LazyListScanner`]: bounded scroll-and-rescan text search over a
//!   lazily rendered listing.
//! - [`NavigationFlow`]: the staged funnel itself, from homepage to a
//!   selected restaurant.
//!
//! All browser access goes through the
//! [`BrowserSession`](tiffin_session::BrowserSession) trait, so the
//! whole crate runs against scripted fakes in tests.

pub mod condition;
pub mod error;
pub mod flow;
pub mod plan;
pub mod resolver;
pub mod retry;
pub mod scanner;
pub mod strategy;
pub mod waiter;

pub use condition::PageCondition;
pub use error::FunnelError;
pub use flow::{FlowStage, NavigationFlow};
pub use plan::{FunnelPlan, ScanBudget, StageTimeouts, TargetSelectors};
pub use resolver::ElementResolver;
pub use retry::bounded_retry;
pub use scanner::LazyListScanner;
pub use strategy::StrategySet;
pub use waiter::{ConditionWaiter, DEFAULT_POLL_INTERVAL};
