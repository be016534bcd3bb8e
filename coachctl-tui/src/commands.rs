//! Non-interactive subcommands

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coachctl_core::{
    BatchFilter, BatchQuery, BatchService, BatchStatus, Capability, CoachConfig, CoachingContext,
    UserContext,
};

use crate::ui::header::count_label;

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only batches with this status (admins only; members always see their own)
    #[arg(long)]
    pub status: Option<BatchStatus>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter config file
    Init(InitArgs),
    /// Show config file path
    Path,
    /// Print the loaded config (token redacted)
    Show,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

/// Print the batches the caller would see on the list screen
pub async fn run_list(
    args: ListArgs,
    coaching: &CoachingContext,
    user: &UserContext,
    service: &dyn BatchService,
) -> Result<()> {
    let capability = Capability::resolve(coaching, user);
    let query = BatchQuery::resolve(capability, BatchFilter::from(args.status));

    let batches = query
        .run(service, &coaching.id)
        .await
        .with_context(|| format!("Failed to list batches of coaching {}", coaching.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&batches)?);
        return Ok(());
    }

    if batches.is_empty() {
        let headline = if capability.is_admin() {
            "No batches yet"
        } else {
            "No batches assigned"
        };
        println!("{}", headline);
        return Ok(());
    }

    println!("{}", count_label(batches.len()));
    for batch in &batches {
        println!(
            "  {:<24} {:<9} {:<16} {}",
            batch.name,
            batch.status.label(),
            batch.subject.as_deref().unwrap_or("-"),
            batch.schedule_label().unwrap_or_default()
        );
    }

    Ok(())
}

pub fn run_config(args: ConfigArgs, config_path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, config_path),
        ConfigCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigCommands::Show => run_show(config_path),
    }
}

fn run_init(args: InitArgs, config_path: &Path) -> Result<()> {
    // Check if config already exists
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        );
    }

    CoachConfig::template().save_to(config_path)?;

    println!("Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Set [session] to your user and coaching ids");
    println!("  3. Run: coachctl");

    Ok(())
}

fn run_show(config_path: &Path) -> Result<()> {
    let mut config = CoachConfig::load_from(config_path)?;
    if config.api.token.is_some() {
        config.api.token = Some("********".to_string());
    }

    let rendered = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("# {}", config_path.display());
    print!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        run_init(InitArgs { force: false }, &path).unwrap();
        assert!(path.exists());

        assert!(run_init(InitArgs { force: false }, &path).is_err());
        assert!(run_init(InitArgs { force: true }, &path).is_ok());
    }

    #[test]
    fn test_show_loads_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = CoachConfig::template();
        config.api.token = Some("secret".into());
        config.save_to(&path).unwrap();

        assert!(run_show(&path).is_ok());
        assert!(run_show(&dir.path().join("missing.toml")).is_err());
    }
}
