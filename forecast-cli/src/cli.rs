use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use forecast_core::{
    BrokerKind, Config, ForecastRecord, ForecastStore, ListChange, ViewService,
    broker::{broker_from_config, remote::RemoteDataBroker},
    server,
};
use inquire::{Select, Text};
use uuid::Uuid;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Forecast CRUD service and client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Host the forecast API.
    Serve {
        /// Address to listen on, e.g. "127.0.0.1:5080".
        #[arg(long)]
        bind: Option<String>,

        /// Number of sample forecasts to start with.
        #[arg(long)]
        seed: Option<usize>,

        /// Forward every call to another forecast API instead of a local store.
        #[arg(long)]
        upstream: Option<String>,
    },

    /// List all forecasts.
    List {
        /// Forecast API base URL.
        #[arg(long)]
        url: Option<String>,
    },

    /// Add a forecast.
    Add {
        /// Forecast date (YYYY-MM-DD); today if absent.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Temperature in Celsius.
        #[arg(long = "temp", allow_negative_numbers = true)]
        temperature_c: i32,

        #[arg(long)]
        summary: String,

        #[arg(long)]
        url: Option<String>,
    },

    /// Delete a forecast by id.
    Delete {
        id: Uuid,

        #[arg(long)]
        url: Option<String>,
    },

    /// Interactively edit the configuration file.
    Configure,
}

impl Command {
    /// Log filter used when `FORECAST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Command::Serve { .. } => "info",
            _ => "warn",
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Serve { bind, seed, upstream } => serve(bind, seed, upstream).await,
            Command::List { url } => {
                let mut view = client_view(url)?;
                view.refresh().await.context("Failed to list forecasts")?;
                Ok(())
            }
            Command::Add { date, temperature_c, summary, url } => {
                let date = date.unwrap_or_else(|| Local::now().date_naive());
                let record = ForecastRecord::new(date, temperature_c, summary);
                let id = record.id;

                let mut view = client_view(url)?;
                if view.add_record(record).await.context("Failed to add forecast")? {
                    println!("Added forecast {id}");
                } else {
                    println!("Forecast {id} was not added: the id already exists");
                }
                Ok(())
            }
            Command::Delete { id, url } => {
                let mut view = client_view(url)?;
                if view.delete_record(id).await.context("Failed to delete forecast")? {
                    println!("Deleted forecast {id}");
                } else {
                    println!("No forecast with id {id}");
                }
                Ok(())
            }
            Command::Configure => configure(),
        }
    }
}

async fn serve(bind: Option<String>, seed: Option<usize>, upstream: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }
    if let Some(seed) = seed {
        config.server.seed = seed;
    }

    let kind = match upstream {
        Some(url) => {
            config.set_remote_base_url(url);
            BrokerKind::Remote
        }
        None => config.default_broker_kind()?,
    };

    let store = match kind {
        BrokerKind::Local => ForecastStore::seeded(config.server.seed, Local::now().date_naive()),
        BrokerKind::Remote => ForecastStore::new(),
    };
    let broker = broker_from_config(kind, &config, Arc::new(store))?;

    let listener = server::bind(config.bind_addr()?).await?;
    server::serve(listener, broker, server::ctrl_c()).await
}

fn client_view(url: Option<String>) -> Result<ViewService> {
    let base_url = match url {
        Some(url) => url,
        None => Config::load()?.client_base_url(),
    };
    tracing::debug!(%base_url, "using forecast API");

    let broker = RemoteDataBroker::new(&base_url)?;
    let mut view = ViewService::new(Arc::new(broker));
    view.subscribe(print_change);
    Ok(view)
}

fn print_change(change: &ListChange<'_>) {
    match change {
        ListChange::Loading => eprintln!("Loading forecasts..."),
        ListChange::Loaded(records) => print!("{}", render_table(records)),
        ListChange::Failed(err) => eprintln!("Could not load forecasts: {err}"),
    }
}

fn render_table(records: &[ForecastRecord]) -> String {
    if records.is_empty() {
        return "No forecasts.\n".to_string();
    }

    let mut out = format!(
        "{:<36}  {:<10}  {:>6}  {:>6}  {}\n",
        "ID", "DATE", "TEMP C", "TEMP F", "SUMMARY"
    );
    for r in records {
        out.push_str(&format!(
            "{:<36}  {:<10}  {:>6}  {:>6}  {}\n",
            r.id,
            r.date,
            r.temperature_c,
            r.temperature_f(),
            r.summary
        ));
    }
    out
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let base_url = Text::new("Forecast API base URL:")
        .with_default(&config.client_base_url())
        .prompt()?;
    RemoteDataBroker::new(&base_url)?;
    config.set_remote_base_url(base_url);

    let bind_addr = Text::new("Address for `forecast serve` to listen on:")
        .with_default(&config.server.bind_addr)
        .prompt()?;
    config.server.bind_addr = bind_addr;
    config.bind_addr()?;

    let current = config.default_broker_kind()?;
    let kinds = BrokerKind::all().to_vec();
    let cursor = kinds.iter().position(|k| *k == current).unwrap_or(0);
    let kind = Select::new("Broker behind `forecast serve`:", kinds)
        .with_starting_cursor(cursor)
        .prompt()?;
    config.set_default_broker(kind);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
