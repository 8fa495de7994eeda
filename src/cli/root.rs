use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::demo::DemoCommand;
use crate::api::{ApiClient, SampleStore, Storefront};
use crate::config::Config;
use crate::modal::{ModalController, SupersedePolicy};
use crate::tui;

/// BookGetter - your bookstore cart in the terminal
#[derive(Parser)]
#[command(
    name = "bookgetter",
    version,
    about = "BookGetter - your bookstore cart in the terminal",
    long_about = r#"BookGetter shows your shopping cart from the BookGetter REST API and lets you
remove items, change quantities, clear the cart and check out. Every question and
notification appears as a modal dialog: answer with the buttons, click outside the
dialog, or press Esc.

Examples:
  bookgetter                                   # Open the cart
  bookgetter --offline                         # Use the built-in sample cart
  bookgetter --api-base http://shop/api        # Use another backend
  bookgetter demo --json                       # Walk through the dialog scenarios"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Base URL of the BookGetter REST API
    #[arg(long = "api-base", global = true)]
    pub api_base: Option<String>,

    /// Use the built-in sample cart instead of the REST API
    #[arg(long = "offline", global = true)]
    pub offline: bool,

    /// Dialog fade-out in milliseconds
    #[arg(long = "fade-ms", global = true)]
    pub fade_ms: Option<u64>,

    /// What happens to a dialog replaced by a newer one (abandon, cancel)
    #[arg(long = "supersede", global = true)]
    pub supersede: Option<SupersedePolicy>,

    /// Do not capture the mouse
    #[arg(long = "no-mouse", global = true)]
    pub no_mouse: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive cart (default)
    Cart,
    /// Walk through the dialog scenarios without a terminal
    Demo(DemoCommand),
}

impl Cli {
    /// Apply command line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.clone();
        }
        if self.offline {
            config.offline = true;
        }
        if let Some(fade_ms) = self.fade_ms {
            config.fade_out_ms = fade_ms;
        }
        if let Some(policy) = self.supersede {
            config.supersede = policy;
        }
        if self.no_mouse {
            config.mouse_enabled = false;
        }
    }

    /// The interactive cart owns the terminal, so its logs go to a file.
    pub fn is_interactive(&self) -> bool {
        !matches!(self.command, Some(Commands::Demo(_)))
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        debug!(?config, "Configuration initialized");

        match self.command {
            Some(Commands::Demo(demo)) => demo.execute(&config).await,
            Some(Commands::Cart) | None => start_interactive_mode(&config).await,
        }
    }
}

async fn start_interactive_mode(config: &Config) -> Result<()> {
    info!("Starting interactive mode");

    let modal = ModalController::with_settings(config.fade_out(), config.supersede);
    let store = build_store(config).await?;
    tui::run(modal, store, config.mouse_enabled).await?;

    info!("Application finished");
    Ok(())
}

/// Pick the REST API when it answers, the sample store otherwise.
async fn build_store(config: &Config) -> Result<Arc<dyn Storefront>> {
    if config.offline {
        info!("Offline mode, using the sample store");
        return Ok(Arc::new(SampleStore::default()));
    }

    let client = ApiClient::new(config.api_base.clone(), config.request_timeout())?;
    match client.session().await {
        Ok(Some(user)) => {
            info!(user = %user.username, "Logged in");
            if user.is_admin() {
                warn!("Administrators cannot access the shopping cart");
            }
        }
        Ok(None) => info!("Not logged in"),
        Err(e) if e.is_unreachable() => {
            warn!("{} is unreachable ({}), using the sample store", config.api_base, e);
            return Ok(Arc::new(SampleStore::default()));
        }
        Err(e) => warn!("Auth check failed: {}", e),
    }

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "bookgetter",
            "--api-base",
            "https://books.example/api",
            "--fade-ms",
            "50",
            "--supersede",
            "cancel",
            "--no-mouse",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.api_base, "https://books.example/api");
        assert_eq!(config.fade_out_ms, 50);
        assert_eq!(config.supersede, SupersedePolicy::Cancel);
        assert!(!config.mouse_enabled);
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_demo_is_not_interactive() {
        let cli = Cli::parse_from(["bookgetter", "demo", "--offline"]);
        assert!(!cli.is_interactive());
        assert!(cli.offline);
    }

    #[test]
    fn test_bad_policy_is_rejected() {
        assert!(Cli::try_parse_from(["bookgetter", "--supersede", "reject"]).is_err());
    }

    #[tokio::test]
    async fn test_offline_store() {
        let mut config = Config::default();
        config.offline = true;
        let store = build_store(&config).await.unwrap();
        assert_eq!(store.name(), "sample store");
    }
}
