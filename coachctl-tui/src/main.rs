//! coachctl - browse and manage the batches of a coaching from the terminal
//!
//! - `coachctl` / `coachctl tui`: interactive batches list
//! - `coachctl list`: the same collection, printed
//! - `coachctl config`: manage ~/.coachctl/config.toml

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coachctl_core::{
    BatchService, CoachConfig, CoachingRole, HttpBatchService, MemoryBatchService,
};
use coachctl_tui::commands::{self, ConfigArgs, ListArgs};
use coachctl_tui::tracing_setup::{init_tracing, TracingConfig};
use coachctl_tui::{terminal, App, BatchesListScreen};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "coachctl",
    author,
    version,
    about = "Browse and manage the batches of a coaching from the terminal"
)]
struct Cli {
    /// Config file (default: $COACHCTL_CONFIG or ~/.coachctl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve batches from a JSON fixture instead of the API
    #[arg(long, global = true, value_name = "JSON")]
    fixture: Option<PathBuf>,

    /// Artificial delay for fixture calls, in milliseconds
    #[arg(long, global = true, value_name = "MS", requires = "fixture")]
    latency: Option<u64>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// API endpoint (overrides [api].endpoint)
    #[arg(long, global = true, env = "COACHCTL_ENDPOINT")]
    endpoint: Option<String>,

    /// Coaching id (overrides [session].coaching_id)
    #[arg(long, global = true)]
    coaching: Option<String>,

    /// Coaching owner id (overrides [session].coaching_owner_id)
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Signed-in user id (overrides [session].user_id)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Role in the coaching: admin, teacher or student
    #[arg(long, global = true)]
    role: Option<CoachingRole>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive batches list (default)
    Tui,
    /// Print the batches visible to the signed-in user
    List(ListArgs),
    /// Manage coachctl configuration (init, path, show)
    Config(ConfigArgs),
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(CoachConfig::config_path)
    }

    /// Load the config file and apply flag overrides
    fn load_config(&self) -> Result<CoachConfig> {
        let path = self.config_path();

        let mut config = if self.fixture.is_some() && !path.exists() {
            // Fixture sessions can run on flags alone
            let mut config = CoachConfig::template();
            config.api.token = None;
            config.session.user_id.clear();
            config.session.coaching_id.clear();
            config.session.coaching_owner_id.clear();
            config.session.role = None;
            config
        } else {
            CoachConfig::load_from(&path)?
        };

        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
        if let Some(coaching) = &self.coaching {
            config.session.coaching_id = coaching.clone();
        }
        if let Some(owner) = &self.owner {
            config.session.coaching_owner_id = owner.clone();
        }
        if let Some(user) = &self.user {
            config.session.user_id = user.clone();
        }
        if self.role.is_some() {
            config.session.role = self.role;
        }

        if config.session.user_id.is_empty() || config.session.coaching_id.is_empty() {
            anyhow::bail!("No session: pass --user and --coaching, or set [session] in the config");
        }

        Ok(config)
    }

    fn build_service(&self, config: &CoachConfig) -> Result<Arc<dyn BatchService>> {
        match &self.fixture {
            Some(path) => {
                let mut service = MemoryBatchService::from_fixture_file(path, &config.session.user_id)
                    .with_context(|| format!("Failed to load fixture {}", path.display()))?;
                if let Some(ms) = self.latency {
                    service = service.with_latency(Duration::from_millis(ms));
                }
                info!(fixture = %path.display(), "using in-memory batch service");
                Ok(Arc::new(service))
            }
            None => {
                let service = HttpBatchService::new(
                    &config.api.endpoint,
                    config.api.token.clone(),
                    config.timeout(),
                )?;
                info!(endpoint = %config.api.endpoint, "using HTTP batch service");
                Ok(Arc::new(service))
            }
        }
    }
}

async fn run_tui(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;

    init_tracing(&TracingConfig {
        debug: cli.debug,
        log_file: Some(config.log_file()),
    })?;

    let service = cli.build_service(&config)?;
    let list = BatchesListScreen::new(
        config.coaching(),
        config.user(),
        Arc::clone(&service),
        config.toast_duration(),
    );

    terminal::run(App::new(list, service), config.tick())
}

async fn run_list(cli: &Cli, args: ListArgs) -> Result<()> {
    init_tracing(&TracingConfig {
        debug: cli.debug,
        log_file: None,
    })?;

    let config = cli.load_config()?;
    let service = cli.build_service(&config)?;
    commands::run_list(args, &config.coaching(), &config.user(), service.as_ref()).await
}

#[tokio::main]
async fn main() {
    let mut cli = Cli::parse();

    let result = match cli.command.take() {
        None | Some(Commands::Tui) => run_tui(&cli).await,
        Some(Commands::List(args)) => run_list(&cli, args).await,
        Some(Commands::Config(args)) => commands::run_config(args, &cli.config_path()),
    };

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}
