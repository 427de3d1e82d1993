use std::io;

use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Select, Text};
use solar_core::{
    Community, Config, Pipeline, PipelineError, SvgChartRenderer, XlsxSink, model,
    provider::provider_from_config,
};
use tracing::Level;

const LOCATION_PROMPT: &str = "Enter the latitude and longitude (comma-separated):";
const DATE_PROMPT: &str = "Enter the date (DD-MM-YYYY):";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "solar",
    version,
    about = "Hourly solar irradiance and temperature from NASA POWER"
)]
pub struct Cli {
    /// Log verbosity.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one day of readings, save them to a spreadsheet and chart them (default).
    Fetch {
        /// Latitude and longitude, e.g. "28.6,77.2". Prompted for when absent.
        #[arg(long, allow_hyphen_values = true)]
        location: Option<String>,

        /// Day to fetch as DD-MM-YYYY. Prompted for when absent.
        #[arg(long)]
        date: Option<String>,
    },

    /// Choose the community code and provider URL.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Fetch { location: None, date: None }) {
            Command::Fetch { location, date } => fetch(location, date).await,
            Command::Configure => configure(),
        }
    }
}

async fn fetch(location: Option<String>, date: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;

    let location = match location {
        Some(l) => l,
        None => Text::new(LOCATION_PROMPT).prompt()?,
    };

    // A bad location ends the run before the date is asked for.
    if let Err(err) = model::validate_coordinates(&location) {
        println!("{err}");
        return Ok(());
    }

    let date = match date {
        Some(d) => d,
        None => Text::new(DATE_PROMPT).prompt()?,
    };

    let pipeline = Pipeline::new(provider, XlsxSink::default(), SvgChartRenderer::default());
    let mut stdout = io::stdout();

    match pipeline.run_input(&location, &date, &mut stdout).await {
        Ok(_) => Ok(()),
        Err(PipelineError::Input(err)) => {
            println!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let communities = Community::all().to_vec();
    let current = config.community().unwrap_or_default();
    let cursor = communities.iter().position(|c| *c == current).unwrap_or(0);

    let community = Select::new("Community code:", communities)
        .with_starting_cursor(cursor)
        .with_help_message("RE = renewable energy, AG = agroclimatology, SB = sustainable buildings")
        .prompt()?;

    let base_url = Text::new("Provider base URL:").with_default(config.base_url()).prompt()?;

    config.set_community(community);
    config.set_base_url(base_url);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_fetch() {
        let cli = Cli::try_parse_from(["solar"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn fetch_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "solar",
            "fetch",
            "--location",
            "-33.9,18.4",
            "--date",
            "01-06-2024",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Fetch { location, date }) => {
                assert_eq!(location.as_deref(), Some("-33.9,18.4"));
                assert_eq!(date.as_deref(), Some("01-06-2024"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_level_is_global() {
        let cli = Cli::try_parse_from(["solar", "configure", "--log-level", "debug"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(Level::from(cli.log_level), Level::DEBUG);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = Cli::try_parse_from(["solar", "--log-level", "loud"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn out_of_range_location_fails_before_date_prompt() {
        let err = model::validate_coordinates("91,0").unwrap_err();
        assert!(err.to_string().contains("Latitude must be between -90 and 90"));
        assert!(model::validate_coordinates("28.6,77.2").is_ok());
    }
}
