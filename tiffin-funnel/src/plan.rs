//! Resolved settings the flow runs with.

use std::time::Duration;

use regex::Regex;
use tiffin_session::Locator;

use crate::strategy::StrategySet;

/// Everything [`NavigationFlow`](crate::NavigationFlow) needs to run,
/// with durations resolved and patterns compiled. The configuration
/// layer builds this from its raw schema; tests assemble small ones by
/// hand.
#[derive(Debug, Clone)]
pub struct FunnelPlan {
    pub base_url: String,
    /// Location typed into the delivery-area input.
    pub location: String,
    /// Restaurant name looked up in the listing.
    pub restaurant: String,
    /// Pause between waiter polls.
    pub poll_interval: Duration,
    /// Pause after a suggestion is accepted, while the page applies it.
    pub settle: Duration,
    /// Pattern the URL must match once the dining section is open.
    pub dining_url: Regex,
    pub timeouts: StageTimeouts,
    pub scan: ScanBudget,
    pub targets: TargetSelectors,
}

/// Deadlines per navigation step.
#[derive(Debug, Clone, Copy)]
pub struct StageTimeouts {
    pub document_ready: Duration,
    pub location_input: Duration,
    pub suggestion: Duration,
    /// Per strategy, not per set.
    pub dining_entry: Duration,
    pub dining_url: Duration,
    pub tab: Duration,
    /// Listing grid and menu confirmation waits.
    pub page_signal: Duration,
}

/// Bounds for the lazy-list scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanBudget {
    pub max_attempts: u32,
    pub scroll_step_px: u32,
    /// Pause after each scroll step while new cards render.
    pub pause: Duration,
}

/// Selector material per funnel target.
#[derive(Debug, Clone)]
pub struct TargetSelectors {
    pub overlay_dismiss: StrategySet,
    pub location_trigger: StrategySet,
    pub location_input: StrategySet,
    pub suggestion: StrategySet,
    pub dining_entry: StrategySet,
    pub online_order_tab: StrategySet,
    pub restaurant_cards: Vec<Locator>,
    pub listing_signals: Vec<Locator>,
    pub menu_signals: Vec<Locator>,
}
