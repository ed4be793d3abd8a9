//! Scripted browser fakes for funnel tests.
//!
//! `FakeSession` serves elements out of a catalog keyed by locator,
//! optionally gated behind a number of scroll steps, and records every
//! call so tests can assert on ordering. No fake ever sleeps for real.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::json;

use tiffin_funnel::{FunnelPlan, ScanBudget, StageTimeouts, StrategySet, TargetSelectors};
use tiffin_session::{BrowserSession, Candidate, ElementHandle, Locator, SessionError};

/// Deadline used for every stage in [`test_plan`]. Generous next to the
/// 1 ms poll interval, tiny in wall-clock terms.
pub const SHORT: Duration = Duration::from_millis(25);

/// Everything the fakes record, shared between session and elements.
#[derive(Debug, Default)]
pub struct Journal {
    /// `click:<label>`, `clear:<label>`, `keys:<label>:<text>`.
    pub actions: Vec<String>,
    /// Locators passed to `wait_for_element`, in call order.
    pub waits: Vec<String>,
    /// Locators passed to `find_element(s)`, in call order.
    pub finds: Vec<String>,
    pub scripts: Vec<String>,
    pub sleeps: Vec<Duration>,
    pub visited: Vec<String>,
}

#[derive(Clone)]
struct PlacedElement {
    selector: String,
    label: String,
    /// `None` makes every text read fail, like a stale handle would.
    text: Option<String>,
    min_scrolls: u32,
}

struct FakeState {
    /// `current_url` answers; the last entry repeats forever.
    urls: Vec<String>,
    /// `document.readyState` answers; the last entry repeats forever.
    ready_states: Vec<String>,
    scroll_count: u32,
    catalog: Vec<PlacedElement>,
}

pub struct FakeSession {
    journal: Arc<Mutex<Journal>>,
    state: Mutex<FakeState>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self {
            journal: Arc::new(Mutex::new(Journal::default())),
            state: Mutex::new(FakeState {
                urls: vec!["https://food.example/".to_string()],
                ready_states: vec!["complete".to_string()],
                scroll_count: 0,
                catalog: Vec::new(),
            }),
        }
    }

    /// Puts an element on the page, visible from the first scan.
    pub fn place(&self, locator: &Locator, label: &str, text: &str) {
        self.place_at_depth(locator, label, text, 0);
    }

    /// Puts an element on the page that only renders once the page has
    /// been scrolled at least `min_scrolls` times.
    pub fn place_at_depth(&self, locator: &Locator, label: &str, text: &str, min_scrolls: u32) {
        self.state.lock().unwrap().catalog.push(PlacedElement {
            selector: locator.to_string(),
            label: label.to_string(),
            text: Some(text.to_string()),
            min_scrolls,
        });
    }

    /// Puts an element on the page whose text reads always fail.
    pub fn place_unreadable(&self, locator: &Locator, label: &str) {
        self.state.lock().unwrap().catalog.push(PlacedElement {
            selector: locator.to_string(),
            label: label.to_string(),
            text: None,
            min_scrolls: 0,
        });
    }

    pub fn set_url(&self, url: &str) {
        self.state.lock().unwrap().urls = vec![url.to_string()];
    }

    /// Scripts consecutive `current_url` answers; the last one repeats.
    pub fn queue_urls(&self, urls: &[&str]) {
        self.state.lock().unwrap().urls = urls.iter().map(|u| u.to_string()).collect();
    }

    /// Scripts consecutive readiness answers; the last one repeats.
    pub fn queue_ready_states(&self, states: &[&str]) {
        self.state.lock().unwrap().ready_states = states.iter().map(|s| s.to_string()).collect();
    }

    pub fn actions(&self) -> Vec<String> {
        self.journal.lock().unwrap().actions.clone()
    }

    pub fn waits(&self) -> Vec<String> {
        self.journal.lock().unwrap().waits.clone()
    }

    pub fn finds(&self) -> Vec<String> {
        self.journal.lock().unwrap().finds.clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.journal.lock().unwrap().scripts.clone()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.journal.lock().unwrap().sleeps.clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.journal.lock().unwrap().visited.clone()
    }

    pub fn scroll_count(&self) -> u32 {
        self.state.lock().unwrap().scroll_count
    }

    fn matching(&self, locator: &Locator) -> Vec<PlacedElement> {
        let state = self.state.lock().unwrap();
        let key = locator.to_string();
        state
            .catalog
            .iter()
            .filter(|placed| placed.selector == key && state.scroll_count >= placed.min_scrolls)
            .cloned()
            .collect()
    }

    fn manufacture(&self, placed: &PlacedElement) -> Candidate {
        Box::new(FakeElement {
            label: placed.label.clone(),
            text: placed.text.clone(),
            journal: Arc::clone(&self.journal),
        })
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&self, url: &str) -> Result<(), SessionError> {
        self.journal.lock().unwrap().visited.push(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        let mut state = self.state.lock().unwrap();
        if state.urls.len() > 1 {
            Ok(state.urls.remove(0))
        } else {
            Ok(state.urls.first().cloned().unwrap_or_default())
        }
    }

    async fn find_element(&self, locator: &Locator) -> Result<Candidate, SessionError> {
        self.journal.lock().unwrap().finds.push(locator.to_string());
        match self.matching(locator).first() {
            Some(placed) => Ok(self.manufacture(placed)),
            None => Err(SessionError::NotFound {
                locator: locator.to_string(),
            }),
        }
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Candidate>, SessionError> {
        self.journal.lock().unwrap().finds.push(locator.to_string());
        Ok(self
            .matching(locator)
            .iter()
            .map(|placed| self.manufacture(placed))
            .collect())
    }

    async fn wait_for_element(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Candidate, SessionError> {
        self.journal.lock().unwrap().waits.push(locator.to_string());
        match self.matching(locator).first() {
            Some(placed) => Ok(self.manufacture(placed)),
            None => Err(SessionError::WaitTimeout {
                locator: locator.to_string(),
                waited_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn execute(&self, script: &str) -> Result<serde_json::Value, SessionError> {
        self.journal.lock().unwrap().scripts.push(script.to_string());
        if script.contains("window.scrollBy") {
            self.state.lock().unwrap().scroll_count += 1;
            return Ok(serde_json::Value::Null);
        }
        if script.contains("document.readyState") {
            let mut state = self.state.lock().unwrap();
            let ready = if state.ready_states.len() > 1 {
                state.ready_states.remove(0)
            } else {
                state
                    .ready_states
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "complete".to_string())
            };
            return Ok(json!(ready));
        }
        Ok(serde_json::Value::Null)
    }

    async fn sleep(&self, pause: Duration) {
        self.journal.lock().unwrap().sleeps.push(pause);
    }
}

pub struct FakeElement {
    label: String,
    text: Option<String>,
    journal: Arc<Mutex<Journal>>,
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn click(&self) -> Result<(), SessionError> {
        self.journal
            .lock()
            .unwrap()
            .actions
            .push(format!("click:{}", self.label));
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.journal
            .lock()
            .unwrap()
            .actions
            .push(format!("clear:{}", self.label));
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), SessionError> {
        self.journal
            .lock()
            .unwrap()
            .actions
            .push(format!("keys:{}:{}", self.label, text));
        Ok(())
    }

    async fn text(&self) -> Result<String, SessionError> {
        match &self.text {
            Some(text) => Ok(text.clone()),
            None => Err(SessionError::Stale(self.label.clone())),
        }
    }
}

/// A plan with tiny timings; the selector sets mirror the production
/// shape (several strategies per target) without the real selectors.
pub fn test_plan() -> FunnelPlan {
    FunnelPlan {
        base_url: "https://food.example/".to_string(),
        location: "bangalore".to_string(),
        restaurant: "Oven Express".to_string(),
        poll_interval: Duration::from_millis(1),
        settle: Duration::from_millis(5),
        dining_url: Regex::new("(?i)dine|dining|dineout").unwrap(),
        timeouts: StageTimeouts {
            document_ready: SHORT,
            location_input: SHORT,
            suggestion: SHORT,
            dining_entry: SHORT,
            dining_url: SHORT,
            tab: SHORT,
            page_signal: SHORT,
        },
        scan: ScanBudget {
            max_attempts: 8,
            scroll_step_px: 800,
            pause: Duration::from_millis(1),
        },
        targets: TargetSelectors {
            overlay_dismiss: StrategySet::new("overlay dismiss", vec![]),
            location_trigger: StrategySet::new(
                "location trigger",
                vec![Locator::css("[data-testid*='location'] button")],
            ),
            location_input: StrategySet::new(
                "location input",
                vec![
                    Locator::css("input#location"),
                    Locator::css("input[placeholder*='area']"),
                ],
            ),
            suggestion: StrategySet::new(
                "location suggestion",
                vec![Locator::css("ul.suggestions li")],
            ),
            dining_entry: StrategySet::new(
                "dining entry",
                vec![
                    Locator::xpath("//a[contains(.,'Dining')]"),
                    Locator::css("a[href*='dineout']"),
                    Locator::xpath("//button[contains(.,'Dining')]"),
                ],
            ),
            online_order_tab: StrategySet::new(
                "online order tab",
                vec![
                    Locator::css("[data-testid*='online-order-tab']"),
                    Locator::xpath("//button[contains(.,'Online Order')]"),
                ],
            ),
            restaurant_cards: vec![
                Locator::css("[data-testid='restaurant-card']"),
                Locator::css("[class*='card']"),
            ],
            listing_signals: vec![Locator::css(".listing-grid")],
            menu_signals: vec![Locator::css("[data-testid='menu-item']")],
        },
    }
}
