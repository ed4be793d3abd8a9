//! The `tiffin` binary: loads configuration, opens a WebDriver
//! session, and drives the dining funnel end to end.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tiffin_common::{init_logging, LogConfig, LogFormat};
use tiffin_config::{ConfigLoader, TiffinConfig};
use tiffin_funnel::NavigationFlow;
use tiffin_session::{BrowserSession, WebDriverSession};
use tracing::{error, info, warn};

const DEFAULT_CONFIG_FILE: &str = "tiffin.yaml";

#[derive(Parser)]
#[command(name = "tiffin", version, about = "Drives the Swiggy dining funnel")]
struct Cli {
    /// Configuration file; when omitted, ./tiffin.yaml is used if it exists
    #[arg(long)]
    config: Option<PathBuf>,

    /// Location typed into the delivery-area search
    #[arg(long)]
    location: Option<String>,

    /// Restaurant name matched against rendered cards
    #[arg(long)]
    restaurant: Option<String>,

    /// WebDriver endpoint, e.g. http://localhost:9515
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Run the browser headless
    #[arg(long)]
    headless: bool,

    /// Directory for daily log files; stderr only when unset
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins), fold in CLI overrides, build the plan.
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let mut cfg = loader.load().context("loading configuration")?;
    apply_cli_overrides(&mut cfg, &cli);
    let plan = cfg.funnel_plan().context("validating configuration")?;

    // 2) Logging.
    let log_path = init_logging(&LogConfig {
        log_dir: cli
            .log_dir
            .clone()
            .or_else(|| cfg.log.dir.as_ref().map(PathBuf::from)),
        format: cli.log_format.map(Into::into).unwrap_or(cfg.log.format),
        ..LogConfig::default()
    })?;
    if let Some(path) = &log_path {
        info!(path = %path.display(), "logging to file");
    }

    // 3) Browser session.
    let session = WebDriverSession::connect(&cfg.webdriver.url, cfg.webdriver.headless)
        .await
        .context("connecting to the webdriver endpoint")?;

    // 4) Run the funnel; the session outlives the flow so it can still
    //    capture a failure screenshot and close cleanly.
    let (outcome, stage) = {
        let mut flow = NavigationFlow::new(&session, plan);
        let outcome = flow.run().await;
        (outcome, flow.stage())
    };

    match &outcome {
        Ok(()) => info!(stage = %stage, "funnel.completed"),
        Err(err) => {
            error!(stage = %stage, error = %err, "funnel.failed");
            if cfg.log.screenshot_on_failure {
                capture_failure_screenshot(&session, log_path.as_deref()).await;
            }
        }
    }

    session
        .close()
        .await
        .context("closing the browser session")?;
    outcome.map_err(Into::into)
}

fn apply_cli_overrides(cfg: &mut TiffinConfig, cli: &Cli) {
    if let Some(location) = &cli.location {
        cfg.location = location.clone();
    }
    if let Some(restaurant) = &cli.restaurant {
        cfg.restaurant = restaurant.clone();
    }
    if let Some(url) = &cli.webdriver_url {
        cfg.webdriver.url = url.clone();
    }
    if cli.headless {
        cfg.webdriver.headless = true;
    }
}

/// Saves a PNG of the page next to the log file, or into the working
/// directory when logging is stderr-only. Capture failures are logged
/// and swallowed; the funnel error is the one worth reporting.
async fn capture_failure_screenshot(session: &WebDriverSession, log_path: Option<&Path>) {
    let dir = log_path
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("tiffin-failure-{stamp}.png"));
    match session.screenshot().await {
        Ok(png) => match std::fs::write(&path, png) {
            Ok(()) => info!(path = %path.display(), "failure screenshot saved"),
            Err(err) => warn!(error = %err, "failure screenshot could not be written"),
        },
        Err(err) => warn!(error = %err, "failure screenshot could not be captured"),
    }
}
