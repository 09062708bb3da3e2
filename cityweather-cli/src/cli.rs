use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use cityweather_core::{Config, QueryError, WeatherQueryService, provider::provider_from_config};
use inquire::{Password, PasswordDisplayMode};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and 5-day forecast for a city")]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key in the config file.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name; several words are joined with spaces.
        city: Vec<String>,

        /// Skip the forecast and show current conditions only.
        #[arg(long)]
        current_only: bool,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                current_only,
                json,
            } => show(&city.join(" "), current_only, json).await,
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut cfg = Config::load()?;

    let key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    cfg.api_key = key.trim().to_string();
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(ExitCode::SUCCESS)
}

async fn show(city: &str, current_only: bool, json: bool) -> anyhow::Result<ExitCode> {
    let cfg = Config::load()?.with_env_overrides();
    if !cfg.has_api_key() {
        tracing::warn!(
            "no API key configured; run `cityweather configure` or set {}",
            cityweather_core::config::API_KEY_ENV
        );
    }

    let service = WeatherQueryService::new(Arc::from(provider_from_config(&cfg)?));

    let text = if current_only {
        match service.query_current(city).await {
            Ok(current) if json => to_json(&current)?,
            Ok(current) => render::render_current(&current),
            Err(err) => return Ok(report(&err)),
        }
    } else {
        match service.query(city).await {
            Ok(result) if json => to_json(&result)?,
            Ok(result) => render::render_result(&result),
            Err(err) => return Ok(report(&err)),
        }
    };

    print!("{text}");
    Ok(ExitCode::SUCCESS)
}

fn report(err: &QueryError) -> ExitCode {
    eprintln!("{}", err.user_message());
    ExitCode::FAILURE
}

fn to_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    let mut json =
        serde_json::to_string_pretty(value).context("Failed to serialize result to JSON")?;
    json.push('\n');
    Ok(json)
}
