use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use weather_lookup_core::{Config, SearchController, WeatherProvider, provider_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for any city")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the default city.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "New York". Defaults to the configured city (London).
        city: Option<String>,

        /// Print the result as JSON instead of a card.
        #[arg(long)]
        json: bool,
    },

    /// Look up the default city, then prompt for more cities until Esc or Ctrl-C.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => show(city, json).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let current_city = config.default_city().to_string();
    let city = Text::new("Default city:")
        .with_default(&current_city)
        .prompt()
        .context("Failed to read default city")?;

    config.set_api_key(api_key.to_string());
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());
    config.save()?;

    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn controller_from_config() -> Result<SearchController<Box<dyn WeatherProvider>>> {
    let config = Config::load_with_env()?;
    let provider = provider_from_config(&config)?;
    debug!(default_city = config.default_city(), "configuration loaded");

    Ok(SearchController::new(provider).with_default_city(config.default_city()))
}

async fn show(city: Option<String>, json: bool) -> Result<()> {
    let mut controller = controller_from_config()?;

    let issued = match city.as_deref() {
        Some(city) => controller.submit_search(Some(city)).await,
        None => controller.mount().await,
    };
    if !issued {
        bail!("City name must not be empty");
    }

    let state = controller.state();
    if let Some(message) = &state.error_message {
        bail!("{message}");
    }

    if let Some(weather) = &state.result {
        if json {
            let out = serde_json::to_string_pretty(weather)
                .context("Failed to serialize weather as JSON")?;
            println!("{out}");
        } else {
            println!("{}", render::state(state));
        }
    }

    Ok(())
}

async fn interactive() -> Result<()> {
    let mut controller = controller_from_config()?;

    println!("{}", render::LOADING);
    controller.mount().await;
    println!("{}", render::state(controller.state()));

    loop {
        let input = match Text::new("City:")
            .with_placeholder("Enter city name...")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        controller.update_query(input);
        let Some(ticket) = controller.begin_search(None) else {
            continue;
        };

        println!("{}", render::state(controller.state()));
        let outcome = controller.provider().fetch_weather(ticket.city()).await;
        controller.finish_search(ticket, outcome);
        println!("{}", render::state(controller.state()));
    }

    Ok(())
}
