//! Chromedriver-backed implementation of [`BrowserSession`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{debug, info};
use webdriver::capabilities::Capabilities;

use crate::locator::Locator;
use crate::session::{BrowserSession, Candidate, ElementHandle, SessionError};

/// Chrome arguments applied to every session.
const BASE_CHROME_ARGS: &[&str] = &[
    "--disable-notifications",
    "--disable-popup-blocking",
    "--start-maximized",
];

/// The single point where a [`Locator`] becomes a driver query.
fn driver_query(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator {
        Locator::Css(selector) => fantoccini::Locator::Css(selector.as_str()),
        Locator::XPath(expression) => fantoccini::Locator::XPath(expression.as_str()),
    }
}

/// A live browser driven over the WebDriver protocol.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connects to a WebDriver endpoint (chromedriver, usually on
    /// `http://localhost:9515`) and starts a browser.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, SessionError> {
        let mut args: Vec<&str> = BASE_CHROME_ARGS.to_vec();
        if headless {
            args.push("--headless=new");
            args.push("--window-size=1920,1080");
        }

        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args", json!(args));

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        info!(url = %webdriver_url, headless, "session.connect");
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;
        Ok(Self { client })
    }

    /// Ends the browser session. Call this on every exit path;
    /// chromedriver keeps orphaned browsers alive otherwise.
    pub async fn close(self) -> Result<(), SessionError> {
        self.client.close().await?;
        Ok(())
    }

    fn wrap(&self, element: Element) -> Candidate {
        Box::new(WebDriverElement {
            client: self.client.clone(),
            element,
        })
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<(), SessionError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn find_element(&self, locator: &Locator) -> Result<Candidate, SessionError> {
        let element = self.client.find(driver_query(locator)).await?;
        Ok(self.wrap(element))
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Candidate>, SessionError> {
        let elements = self.client.find_all(driver_query(locator)).await?;
        Ok(elements.into_iter().map(|e| self.wrap(e)).collect())
    }

    async fn wait_for_element(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Candidate, SessionError> {
        let wait = self.client.wait().at_most(timeout);
        match wait.for_element(driver_query(locator)).await {
            Ok(element) => Ok(self.wrap(element)),
            Err(CmdError::WaitTimeout) => Err(SessionError::WaitTimeout {
                locator: locator.to_string(),
                waited_ms: timeout.as_millis() as u64,
            }),
            Err(other) => Err(other.into()),
        }
    }

    async fn execute(&self, script: &str) -> Result<serde_json::Value, SessionError> {
        Ok(self.client.execute(script, vec![]).await?)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        Ok(self.client.screenshot().await?)
    }
}

/// One resolved element plus the client that found it, kept around for
/// script-based recovery.
pub struct WebDriverElement {
    client: Client,
    element: Element,
}

impl WebDriverElement {
    fn as_script_arg(&self) -> Result<serde_json::Value, SessionError> {
        serde_json::to_value(&self.element).map_err(|e| SessionError::Script(e.to_string()))
    }
}

#[async_trait]
impl ElementHandle for WebDriverElement {
    async fn click(&self) -> Result<(), SessionError> {
        self.element.click().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.element.clear().await?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), SessionError> {
        self.element.send_keys(text).await?;
        Ok(())
    }

    async fn text(&self) -> Result<String, SessionError> {
        Ok(self.element.text().await?)
    }

    async fn click_with_recovery(&self) -> Result<(), SessionError> {
        let arg = self.as_script_arg()?;
        // Center the element first; a failed scroll never blocks the click.
        let _ = self
            .client
            .execute(
                "arguments[0].scrollIntoView({block:'center'});",
                vec![arg.clone()],
            )
            .await;
        match self.element.click().await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.client
                    .execute("arguments[0].click();", vec![arg])
                    .await?;
                debug!(native_error = %err, "session.click.recovered");
                Ok(())
            }
        }
    }
}
