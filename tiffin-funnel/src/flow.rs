//! The staged navigation flow over a food-delivery site.

use std::fmt;

use tracing::{debug, info, warn};
use uuid::Uuid;

use tiffin_session::BrowserSession;

use crate::condition::PageCondition;
use crate::error::FunnelError;
use crate::plan::FunnelPlan;
use crate::resolver::ElementResolver;
use crate::scanner::LazyListScanner;
use crate::waiter::ConditionWaiter;

/// Milestones of the funnel, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Start,
    LocationSet,
    DiningOpened,
    OnlineOrderTabOpened,
    RestaurantSelected,
}

impl FlowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStage::Start => "start",
            FlowStage::LocationSet => "location-set",
            FlowStage::DiningOpened => "dining-opened",
            FlowStage::OnlineOrderTabOpened => "online-order-tab-opened",
            FlowStage::RestaurantSelected => "restaurant-selected",
        }
    }
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives a browser session through the funnel stage by stage.
///
/// Stage methods enforce their precondition: calling one out of order
/// is [`FunnelError::InvalidState`] rather than a blind attempt against
/// whatever page happens to be open. [`NavigationFlow::run`] restarts
/// from the homepage, so running it twice performs the funnel twice.
pub struct NavigationFlow<'s, S> {
    session: &'s S,
    plan: FunnelPlan,
    stage: FlowStage,
    run_id: Uuid,
}

impl<'s, S: BrowserSession> NavigationFlow<'s, S> {
    pub fn new(session: &'s S, plan: FunnelPlan) -> Self {
        Self {
            session,
            plan,
            stage: FlowStage::Start,
            run_id: Uuid::new_v4(),
        }
    }

    /// The stage the flow has reached so far.
    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    /// Correlates every log event of one funnel pass.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The whole funnel: homepage, location, dining section, online
    /// order tab, restaurant. Stops at the first unrecovered failure.
    pub async fn run(&mut self) -> Result<(), FunnelError> {
        let location = self.plan.location.clone();
        let restaurant = self.plan.restaurant.clone();
        self.open_home().await?;
        self.set_location(&location).await?;
        self.go_to_dining_page().await?;
        self.go_to_online_order_tab().await?;
        self.select_restaurant_by_name(&restaurant).await?;
        Ok(())
    }

    /// Opens the configured homepage and waits for the document to
    /// settle. Resets the flow to [`FlowStage::Start`].
    pub async fn open_home(&mut self) -> Result<(), FunnelError> {
        self.stage = FlowStage::Start;
        info!(run_id = %self.run_id, url = %self.plan.base_url, "funnel.home.start");
        self.session.goto(&self.plan.base_url).await?;
        self.waiter()
            .wait_for(
                &PageCondition::DocumentReady,
                self.plan.timeouts.document_ready,
            )
            .await?;
        self.dismiss_overlays().await;
        info!(run_id = %self.run_id, "funnel.home.ok");
        Ok(())
    }

    /// Types the delivery location and accepts the first suggestion.
    pub async fn set_location(&mut self, location: &str) -> Result<(), FunnelError> {
        self.require_stage("set_location", FlowStage::Start)?;
        info!(run_id = %self.run_id, location, "funnel.location.start");

        let resolver = self.resolver();
        // The trigger only exists while the input is collapsed; absence
        // means typing can start right away.
        match resolver.peek(&self.plan.targets.location_trigger).await {
            Some(trigger) => match trigger.click_with_recovery().await {
                Ok(()) => debug!(run_id = %self.run_id, "funnel.location.trigger_clicked"),
                Err(err) => {
                    debug!(run_id = %self.run_id, error = %err, "funnel.location.trigger_click_failed")
                }
            },
            None => debug!(run_id = %self.run_id, "funnel.location.trigger_absent"),
        }

        let input = match resolver
            .resolve(
                &self.plan.targets.location_input,
                self.plan.timeouts.location_input,
            )
            .await
        {
            Ok(input) => input,
            Err(FunnelError::NotFound { .. }) => return Err(FunnelError::LocationInputNotFound),
            Err(other) => return Err(other),
        };
        input.clear().await?;
        input.send_keys(location).await?;

        let suggestion = match resolver
            .resolve(&self.plan.targets.suggestion, self.plan.timeouts.suggestion)
            .await
        {
            Ok(suggestion) => suggestion,
            Err(FunnelError::NotFound { .. }) => {
                return Err(FunnelError::SuggestionNotFound {
                    query: location.to_string(),
                });
            }
            Err(other) => return Err(other),
        };
        suggestion.click_with_recovery().await?;

        // The page needs a beat to apply the location before the header
        // and listings reflect it.
        self.session.sleep(self.plan.settle).await;

        self.stage = FlowStage::LocationSet;
        info!(run_id = %self.run_id, stage = %self.stage, "funnel.location.ok");
        Ok(())
    }

    /// Clicks through to the dining section and confirms it by URL.
    pub async fn go_to_dining_page(&mut self) -> Result<(), FunnelError> {
        self.require_stage("go_to_dining_page", FlowStage::LocationSet)?;
        info!(run_id = %self.run_id, "funnel.dining.start");

        let entry = match self
            .resolver()
            .resolve(
                &self.plan.targets.dining_entry,
                self.plan.timeouts.dining_entry,
            )
            .await
        {
            Ok(entry) => entry,
            Err(FunnelError::NotFound { .. }) => return Err(FunnelError::DiningLinkNotFound),
            Err(other) => return Err(other),
        };
        entry.click_with_recovery().await?;

        let on_dining = PageCondition::UrlMatches(self.plan.dining_url.clone());
        self.waiter()
            .wait_for(&on_dining, self.plan.timeouts.dining_url)
            .await?;

        self.stage = FlowStage::DiningOpened;
        info!(run_id = %self.run_id, stage = %self.stage, "funnel.dining.ok");
        Ok(())
    }

    /// Switches the dining section to its online-order tab.
    pub async fn go_to_online_order_tab(&mut self) -> Result<(), FunnelError> {
        self.require_stage("go_to_online_order_tab", FlowStage::DiningOpened)?;
        info!(run_id = %self.run_id, "funnel.tab.start");

        let tab = match self
            .resolver()
            .resolve(&self.plan.targets.online_order_tab, self.plan.timeouts.tab)
            .await
        {
            Ok(tab) => tab,
            Err(FunnelError::NotFound { .. }) => return Err(FunnelError::TabNotFound),
            Err(other) => return Err(other),
        };
        tab.click_with_recovery().await?;

        let listing = PageCondition::AnyOf(self.plan.targets.listing_signals.clone());
        self.waiter()
            .wait_for(&listing, self.plan.timeouts.page_signal)
            .await?;

        self.stage = FlowStage::OnlineOrderTabOpened;
        info!(run_id = %self.run_id, stage = %self.stage, "funnel.tab.ok");
        Ok(())
    }

    /// Scans the listing for `name` and opens that restaurant.
    pub async fn select_restaurant_by_name(&mut self, name: &str) -> Result<(), FunnelError> {
        self.require_stage("select_restaurant_by_name", FlowStage::OnlineOrderTabOpened)?;
        info!(run_id = %self.run_id, name, "funnel.restaurant.start");

        let scanner = LazyListScanner::new(
            self.session,
            self.plan.scan.scroll_step_px,
            self.plan.scan.pause,
        );
        let card = scanner
            .find_by_text(
                &self.plan.targets.restaurant_cards,
                name,
                self.plan.scan.max_attempts,
            )
            .await?;
        let Some(card) = card else {
            return Err(FunnelError::RestaurantNotFound {
                name: name.to_string(),
            });
        };
        card.click_with_recovery().await?;

        let menu = PageCondition::AnyOf(self.plan.targets.menu_signals.clone());
        self.waiter()
            .wait_for(&menu, self.plan.timeouts.page_signal)
            .await?;

        self.stage = FlowStage::RestaurantSelected;
        info!(run_id = %self.run_id, stage = %self.stage, "funnel.restaurant.ok");
        Ok(())
    }

    fn resolver(&self) -> ElementResolver<'s, S> {
        ElementResolver::new(self.session)
    }

    fn waiter(&self) -> ConditionWaiter<'s, S> {
        ConditionWaiter::new(self.session).with_poll_interval(self.plan.poll_interval)
    }

    fn require_stage(&self, method: &'static str, expected: FlowStage) -> Result<(), FunnelError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(FunnelError::InvalidState {
                method,
                expected,
                actual: self.stage,
            })
        }
    }

    /// Consent banners and app prompts steal the first click. Best
    /// effort: no overlay, or a failed dismissal, is not an error.
    async fn dismiss_overlays(&self) {
        match self.resolver().peek(&self.plan.targets.overlay_dismiss).await {
            Some(dismiss) => match dismiss.click_with_recovery().await {
                Ok(()) => debug!(run_id = %self.run_id, "funnel.overlay.dismissed"),
                Err(err) => {
                    warn!(run_id = %self.run_id, error = %err, "funnel.overlay.dismiss_failed")
                }
            },
            None => debug!(run_id = %self.run_id, "funnel.overlay.none"),
        }
    }
}
