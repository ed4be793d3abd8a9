//! Ordered sets of locator strategies.

use tiffin_session::Locator;

/// A labelled, ordered list of locators that all point at the same
/// logical target. Order encodes preference: earlier entries are the
/// more specific or more stable selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySet {
    label: String,
    strategies: Vec<Locator>,
}

impl StrategySet {
    /// ```
    /// use tiffin_funnel::StrategySet;
    /// use tiffin_session::Locator;
    ///
    /// let set = StrategySet::new(
    ///     "search box",
    ///     vec![Locator::css("input[name=q]"), Locator::xpath("//input")],
    /// );
    /// assert_eq!(set.label(), "search box");
    /// assert_eq!(set.strategies().len(), 2);
    /// ```
    pub fn new(label: impl Into<String>, strategies: Vec<Locator>) -> Self {
        Self {
            label: label.into(),
            strategies,
        }
    }

    /// Human-readable name of the target, used in logs and errors.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn strategies(&self) -> &[Locator] {
        &self.strategies
    }

    /// An empty set is legal and simply never resolves; it is how a
    /// configuration turns an optional target off.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
