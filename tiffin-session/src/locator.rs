//! Typed element locators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One way of addressing an element in the page.
///
/// YAML and JSON spell a locator as a one-entry map, for example
/// `css: "input[name=q]"` or `xpath: "//a[@href]"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css:{selector}"),
            Locator::XPath(expression) => write!(f, "xpath:{expression}"),
        }
    }
}
