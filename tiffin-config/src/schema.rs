//! Typed configuration schema with production defaults.
//!
//! Every section carries `#[serde(default)]` so a file or the
//! environment only needs to name the keys it changes. Raw values stay
//! close to their YAML shape (millisecond integers, pattern strings);
//! [`TiffinConfig::funnel_plan`] converts and validates them into the
//! typed plan the funnel runs on.

use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tiffin_common::LogFormat;
use tiffin_funnel::{FunnelPlan, ScanBudget, StageTimeouts, StrategySet, TargetSelectors};
use tiffin_session::Locator;
use url::Url;

use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TiffinConfig {
    /// Homepage the funnel starts from.
    pub base_url: String,
    /// Location typed into the delivery-area search.
    pub location: String,
    /// Restaurant name matched against rendered cards.
    pub restaurant: String,
    pub webdriver: WebDriverSection,
    /// Condition poll cadence.
    pub poll_interval_ms: u64,
    /// Pause after the location suggestion is picked, before the page
    /// is trusted to reflect it.
    pub settle_ms: u64,
    /// Pattern the URL must match once the dining section is open.
    pub dining_url_pattern: String,
    pub timeouts_ms: TimeoutsSection,
    pub scan: ScanSection,
    pub selectors: SelectorsSection,
    pub log: LogSection,
}

impl Default for TiffinConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.swiggy.com/".into(),
            location: "bangalore".into(),
            restaurant: "Oven Express".into(),
            webdriver: WebDriverSection::default(),
            poll_interval_ms: 250,
            settle_ms: 1_000,
            dining_url_pattern: "(?i)dine|dining|dineout".into(),
            timeouts_ms: TimeoutsSection::default(),
            scan: ScanSection::default(),
            selectors: SelectorsSection::default(),
            log: LogSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebDriverSection {
    /// Endpoint of a running chromedriver.
    pub url: String,
    pub headless: bool,
}

impl Default for WebDriverSection {
    fn default() -> Self {
        Self {
            url: "http://localhost:9515".into(),
            headless: false,
        }
    }
}

/// Stage timeouts, all in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutsSection {
    pub document_ready: u64,
    pub location_input: u64,
    pub suggestion: u64,
    /// Per dining strategy, not per set.
    pub dining_entry: u64,
    pub dining_url: u64,
    pub tab: u64,
    pub page_signal: u64,
}

impl Default for TimeoutsSection {
    fn default() -> Self {
        Self {
            document_ready: 10_000,
            location_input: 10_000,
            suggestion: 10_000,
            dining_entry: 5_000,
            dining_url: 10_000,
            tab: 10_000,
            page_signal: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    pub max_attempts: u32,
    pub scroll_step_px: u32,
    pub pause_ms: u64,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            scroll_step_px: 800,
            pause_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Directory for daily log files; unset means stderr only.
    pub dir: Option<String>,
    pub format: LogFormat,
    /// Capture a screenshot next to the logs when the funnel fails.
    pub screenshot_on_failure: bool,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            screenshot_on_failure: true,
        }
    }
}

/// Locator chains for every page target, ordered most to least
/// specific. Swiggy reshuffles test ids and class names between
/// deploys; the chains lean on stable attributes first and text
/// content last.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorsSection {
    /// May be empty: no overlay dismissal is attempted then.
    pub overlay_dismiss: Vec<Locator>,
    /// May be empty: typing starts without a trigger click then.
    pub location_trigger: Vec<Locator>,
    pub location_input: Vec<Locator>,
    pub suggestion: Vec<Locator>,
    pub dining_entry: Vec<Locator>,
    pub online_order_tab: Vec<Locator>,
    pub restaurant_cards: Vec<Locator>,
    pub listing_signals: Vec<Locator>,
    pub menu_signals: Vec<Locator>,
}

impl Default for SelectorsSection {
    fn default() -> Self {
        Self {
            overlay_dismiss: vec![
                Locator::xpath(
                    "//button[contains(@aria-label,'close')] | //div[contains(@aria-label,'close')]",
                ),
                Locator::xpath(
                    "//button[contains(@class,'close')] | //div[contains(@class,'close')]",
                ),
                Locator::xpath("//button[contains(text(),'Later')] | //button[contains(text(),'Skip')]"),
            ],
            location_trigger: vec![
                Locator::css("[data-testid*=\"location\"] button"),
                Locator::css("[aria-label*=\"location\" i]"),
                Locator::css("[data-testid*=\"change-address\"]"),
            ],
            location_input: vec![
                Locator::css("input[placeholder*=\"location\" i]"),
                Locator::css("input[placeholder*=\"delivery\" i]"),
                Locator::css("input[placeholder*=\"area\" i]"),
            ],
            suggestion: vec![
                Locator::css("[role=\"listbox\"] [role=\"option\"]"),
                Locator::css("[data-testid*=\"suggestion\"] li"),
                Locator::css("li[class*=\"suggestion\"]"),
            ],
            dining_entry: vec![
                Locator::xpath("//a[.//text()[contains(.,'Dining') or contains(.,'Dineout')]]"),
                Locator::css("a[href*='dineout'], a[href*='dining']"),
                Locator::xpath(
                    "//button[.//text()[contains(.,'Dining') or contains(.,'Dineout')]]",
                ),
            ],
            online_order_tab: vec![
                Locator::css("[data-testid*=\"online-order-tab\"]"),
                Locator::xpath(concat!(
                    "//button[contains(translate(.,'ABCDEFGHIJKLMNOPQRSTUVWXYZ',",
                    "'abcdefghijklmnopqrstuvwxyz'),'online order')",
                    " or contains(translate(.,'ABCDEFGHIJKLMNOPQRSTUVWXYZ',",
                    "'abcdefghijklmnopqrstuvwxyz'),'order online')",
                    " or contains(translate(.,'ABCDEFGHIJKLMNOPQRSTUVWXYZ',",
                    "'abcdefghijklmnopqrstuvwxyz'),'delivery')]",
                )),
            ],
            restaurant_cards: vec![
                Locator::css("[data-testid=\"restaurant-card\"]"),
                Locator::css("[class*=\"restaurant\"]:not([role=\"tab\"])"),
                Locator::css("[class*=\"card\"]"),
            ],
            listing_signals: vec![
                Locator::css("[data-testid=\"restaurant-card\"]"),
                Locator::css("[class*=\"restaurant\"], [class*=\"card\"]"),
            ],
            menu_signals: vec![
                Locator::css("[data-testid=\"menu-item\"]"),
                Locator::css("[class*=\"menu\"] [class*=\"item\"]"),
                Locator::xpath(concat!(
                    "//*[contains(translate(.,'ABCDEFGHIJKLMNOPQRSTUVWXYZ',",
                    "'abcdefghijklmnopqrstuvwxyz'),'recommended')]",
                )),
            ],
        }
    }
}

impl TiffinConfig {
    /// Validates the raw values and converts them into the typed plan
    /// the funnel consumes.
    pub fn funnel_plan(&self) -> Result<FunnelPlan, ConfigError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url: {e}")))?;
        let dining_url = Regex::new(&self.dining_url_pattern)
            .map_err(|e| ConfigError::Invalid(format!("dining_url_pattern: {e}")))?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be > 0".into()));
        }
        if self.scan.max_attempts == 0 {
            return Err(ConfigError::Invalid("scan.max_attempts must be > 0".into()));
        }

        let s = &self.selectors;
        require_nonempty("selectors.location_input", &s.location_input)?;
        require_nonempty("selectors.suggestion", &s.suggestion)?;
        require_nonempty("selectors.dining_entry", &s.dining_entry)?;
        require_nonempty("selectors.online_order_tab", &s.online_order_tab)?;
        require_nonempty("selectors.restaurant_cards", &s.restaurant_cards)?;
        require_nonempty("selectors.listing_signals", &s.listing_signals)?;
        require_nonempty("selectors.menu_signals", &s.menu_signals)?;

        let t = &self.timeouts_ms;
        Ok(FunnelPlan {
            base_url: base_url.to_string(),
            location: self.location.clone(),
            restaurant: self.restaurant.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            settle: Duration::from_millis(self.settle_ms),
            dining_url,
            timeouts: StageTimeouts {
                document_ready: Duration::from_millis(t.document_ready),
                location_input: Duration::from_millis(t.location_input),
                suggestion: Duration::from_millis(t.suggestion),
                dining_entry: Duration::from_millis(t.dining_entry),
                dining_url: Duration::from_millis(t.dining_url),
                tab: Duration::from_millis(t.tab),
                page_signal: Duration::from_millis(t.page_signal),
            },
            scan: ScanBudget {
                max_attempts: self.scan.max_attempts,
                scroll_step_px: self.scan.scroll_step_px,
                pause: Duration::from_millis(self.scan.pause_ms),
            },
            targets: TargetSelectors {
                overlay_dismiss: StrategySet::new("overlay dismiss", s.overlay_dismiss.clone()),
                location_trigger: StrategySet::new("location trigger", s.location_trigger.clone()),
                location_input: StrategySet::new("location input", s.location_input.clone()),
                suggestion: StrategySet::new("location suggestion", s.suggestion.clone()),
                dining_entry: StrategySet::new("dining entry", s.dining_entry.clone()),
                online_order_tab: StrategySet::new("online order tab", s.online_order_tab.clone()),
                restaurant_cards: s.restaurant_cards.clone(),
                listing_signals: s.listing_signals.clone(),
                menu_signals: s.menu_signals.clone(),
            },
        })
    }
}

fn require_nonempty(field: &str, locators: &[Locator]) -> Result<(), ConfigError> {
    if locators.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{field} must list at least one locator"
        )));
    }
    Ok(())
}
