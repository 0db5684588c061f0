use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select};

use accuscrape_core::config::{Config, DEFAULT_UPDATE_INTERVAL, MAX_UPDATE_INTERVAL, MIN_UPDATE_INTERVAL};
use accuscrape_core::extract::localize_bearing;
use accuscrape_core::model::{daily_entry_datetime, hourly_entry_datetime};
use accuscrape_core::{
    Coordinator, HttpPageSource, LocationRef, Snapshot, default_client, search_locations,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "accuscrape", version, about = "AccuWeather page scraper")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up location candidates for a place name.
    Search {
        /// Place name to search for.
        query: String,
    },

    /// Search for a location, pick one interactively and save it.
    Setup {
        /// Place name to search for.
        query: String,
    },

    /// Fetch one snapshot for the configured (or given) location.
    Show {
        /// Location key, overriding the configured one.
        #[arg(long)]
        key: Option<String>,

        /// Display name to go with --key.
        #[arg(long)]
        name: Option<String>,

        /// Print the raw snapshot as JSON instead of the report.
        #[arg(long)]
        json: bool,
    },

    /// Poll the configured location on an interval, printing a summary line
    /// per cycle.
    Watch {
        /// Poll interval in seconds; defaults to the configured value.
        #[arg(long)]
        interval: Option<u64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Search { query } => search(&query).await,
            Command::Setup { query } => setup(&query).await,
            Command::Show { key, name, json } => show(key, name, json).await,
            Command::Watch { interval } => watch(interval).await,
        }
    }
}

async fn search(query: &str) -> anyhow::Result<()> {
    let http = default_client().context("Failed to build HTTP client")?;
    let matches = search_locations(&http, query).await;

    if matches.is_empty() {
        println!("No locations found for \"{query}\".");
        return Ok(());
    }

    for m in &matches {
        let long_name = m.long_name.as_deref().unwrap_or("-");
        println!("Key: {} | Name: {} | Full: {}", m.key, m.localized_name, long_name);
    }

    Ok(())
}

async fn setup(query: &str) -> anyhow::Result<()> {
    let http = default_client().context("Failed to build HTTP client")?;
    let matches = search_locations(&http, query).await;

    if matches.is_empty() {
        anyhow::bail!("No locations found for \"{query}\". Try a different spelling.");
    }

    let options: Vec<String> = matches
        .iter()
        .map(|m| {
            format!(
                "{} ({})",
                m.localized_name,
                m.long_name.as_deref().unwrap_or(&m.key)
            )
        })
        .collect();

    let choice = Select::new("Choose a location:", options).raw_prompt()?;
    let chosen = &matches[choice.index];

    let interval = CustomType::<u64>::new(&format!(
        "Poll interval in seconds ({MIN_UPDATE_INTERVAL}-{MAX_UPDATE_INTERVAL}):"
    ))
    .with_default(DEFAULT_UPDATE_INTERVAL)
    .prompt()?
    .clamp(MIN_UPDATE_INTERVAL, MAX_UPDATE_INTERVAL);

    let mut cfg = Config::load()?;
    cfg.set_location(&LocationRef {
        key: chosen.key.clone(),
        name: chosen.localized_name.clone(),
    });
    cfg.update_interval = Some(interval);
    cfg.save()?;

    println!(
        "Saved {} (key {}) with a {interval}s interval to {}.",
        chosen.localized_name,
        chosen.key,
        Config::config_file_path()?.display()
    );

    Ok(())
}

async fn show(key: Option<String>, name: Option<String>, json: bool) -> anyhow::Result<()> {
    let location = match key {
        Some(key) => {
            let name = name.unwrap_or_else(|| key.clone());
            LocationRef { key, name }
        }
        None => Config::load()?.location()?,
    };

    let http = default_client().context("Failed to build HTTP client")?;
    let coordinator = Coordinator::new(HttpPageSource::new(http), location);
    let snapshot = coordinator
        .refresh()
        .await
        .context("Refresh cycle failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    Ok(())
}

async fn watch(interval: Option<u64>) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let location = cfg.location()?;
    let secs = interval
        .unwrap_or_else(|| cfg.clamped_interval())
        .clamp(MIN_UPDATE_INTERVAL, MAX_UPDATE_INTERVAL);

    let http = default_client().context("Failed to build HTTP client")?;
    let coordinator = Coordinator::new(HttpPageSource::new(http), location);

    println!(
        "Watching {} every {secs}s. Ctrl-C to stop.",
        coordinator.location().name
    );

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(secs));
    loop {
        ticker.tick().await;
        match coordinator.refresh().await {
            Ok(snapshot) => {
                let current = &snapshot.current;
                println!(
                    "[{}] {}: {} {} | humidity {} | {} daily / {} hourly entries",
                    Local::now().format("%H:%M:%S"),
                    snapshot.location.name,
                    fmt_value(current.temperature, "°C"),
                    current.condition,
                    fmt_value(current.humidity, "%"),
                    snapshot.daily_forecast.len(),
                    snapshot.hourly_forecast.len(),
                );
            }
            Err(err) => {
                // Stale data is the consumer's concern; the loop keeps going.
                tracing::error!(error = %err, "refresh cycle failed");
            }
        }
    }
}

fn fmt_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v}{unit}"),
        None => "unknown".to_string(),
    }
}

fn print_snapshot(snapshot: &Snapshot) {
    let now = Local::now();
    let current = &snapshot.current;

    println!("--- Current conditions: {} ---", snapshot.location.name);
    if let Some(time) = &current.time {
        println!("Updated:      {time}");
    }
    println!("Temperature:  {}", fmt_value(current.temperature, &current.temperature_unit));
    println!(
        "Condition:    {} ({})",
        current.condition,
        current.phrase.as_deref().unwrap_or("-")
    );
    if let Some(realfeel) = &current.realfeel {
        println!("RealFeel:     {realfeel}");
    }
    if let Some(shade) = &current.realfeel_shade {
        println!("In the shade: {shade}");
    }
    println!("Humidity:     {}", fmt_value(current.humidity, "%"));
    println!("Pressure:     {}", fmt_value(current.pressure, " mb"));
    let bearing = current
        .wind_bearing
        .as_deref()
        .map(localize_bearing)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "Wind:         {} from {}",
        fmt_value(current.wind_speed, " km/h"),
        bearing
    );
    println!("Visibility:   {}", fmt_value(current.visibility, " km"));
    println!("Cloud cover:  {}", fmt_value(current.cloud_coverage, "%"));
    println!("UV index:     {}", fmt_value(current.uv_index, ""));

    if let Some(cast) = &snapshot.minutecast {
        println!("\n--- MinuteCast ---");
        println!("{}", cast.summary);
    }

    if !snapshot.hourly_forecast.is_empty() {
        println!("\n--- Hourly forecast ---");
        for (i, entry) in snapshot.hourly_forecast.iter().enumerate() {
            let when = hourly_entry_datetime(&now, i);
            println!(
                "{} ({}): {} {} | precip {}",
                entry.label.as_deref().unwrap_or("?"),
                when.format("%d/%m %H:%M"),
                fmt_value(entry.temperature, "°"),
                entry.condition,
                fmt_value(entry.precipitation_probability, "%"),
            );
        }
    }

    if !snapshot.daily_forecast.is_empty() {
        println!("\n--- Daily forecast ---");
        for (i, entry) in snapshot.daily_forecast.iter().enumerate() {
            let when = daily_entry_datetime(entry.label.as_deref(), &now, i);
            println!(
                "{} ({}): {} / {} {} | precip {}",
                entry.label.as_deref().unwrap_or("?"),
                when.format("%d/%m"),
                fmt_value(entry.temperature, "°"),
                fmt_value(entry.temperature_low, "°"),
                entry.condition,
                fmt_value(entry.precipitation_probability, "%"),
            );
        }
    }

    println!("\n--- Air quality ---");
    println!(
        "{}: {}",
        snapshot.air_quality.category.as_deref().unwrap_or("unknown"),
        snapshot.air_quality.description.as_deref().unwrap_or("-")
    );
    for (pollutant, reading) in &snapshot.air_quality.pollutants {
        println!(
            "  {pollutant}: {} {} (AQI {})",
            reading.value.map(|v| v.to_string()).unwrap_or_else(|| "?".into()),
            reading.unit.as_deref().unwrap_or(""),
            reading.aqi.map(|v| v.to_string()).unwrap_or_else(|| "?".into()),
        );
    }

    for (group, items) in &snapshot.health_activities {
        if items.is_empty() {
            continue;
        }
        println!("\n--- {} ---", group.label());
        for item in items {
            let name = item
                .localized_name
                .as_deref()
                .or(item.name.as_deref())
                .unwrap_or("?");
            println!(
                "  {name}: {} ({})",
                item.value.map(|v| v.to_string()).unwrap_or_else(|| "?".into()),
                item.localized_category
                    .as_deref()
                    .or(item.category.as_deref())
                    .unwrap_or("-"),
            );
        }
    }
}
