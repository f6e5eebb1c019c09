//! RunClub - Run club attendance analytics
//!
//! Loads the configured sheet exports, refreshes the location cache when the
//! schedule allows, and prints the dashboard snapshot as JSON.
//!
//! Usage: `runclub [CONFIG] [CAP_NUMBER]`. With a cap-number, the runner's
//! wrapped report is also written next to the data.

use anyhow::Context;
use chrono::{Datelike, Local};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use runclub::dashboard::{
    ClubData, DashboardSnapshot, DataCache, FileDataSource, RunnerProfile, SessionFlags, SessionId,
};
use runclub::geocode::{
    LocationResolver, NominatimGeocoder, RefreshSchedule, ResolveReport, SqliteLocationCache,
};
use runclub::storage::config::{load_config, load_config_from};
use runclub::storage::{AppConfig, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting RunClub v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config_from(Path::new(&path))?,
        None => load_config()?,
    };
    let wrapped_for = args.next();

    let cache = DataCache::new(FileDataSource::from_config(&config));
    let data = cache.get().context("failed to load club data")?;

    let coordinates = match resolve_locations(&config, &data).await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("Location lookup unavailable: {:#}", e);
            ResolveReport::default()
        }
    };

    let snapshot = DashboardSnapshot::build(&data, &config, &coordinates);
    let flags = SessionFlags::new();
    if let Some(runner) = snapshot.welcome_newest(&flags, SessionId::new()) {
        tracing::info!("Welcome to our newest runner, {} (cap {})", runner.name, runner.capnumber);
    }
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if let Some(input) = wrapped_for {
        let profile = RunnerProfile::lookup(&data, &input, &config)?;
        match profile.summary {
            Some(summary) => {
                let path = config.resolve_path(Path::new(&summary.file_name()));
                std::fs::write(&path, summary.render_text())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!("Wrote {}", path.display());
            }
            None => tracing::warn!("{} has no recorded runs", profile.runner.name),
        }
    }

    Ok(())
}

/// Read cached coordinates, geocoding new locations on scheduled days.
async fn resolve_locations(config: &AppConfig, data: &ClubData) -> anyhow::Result<ResolveReport> {
    let settings = &config.geocode;
    let db = Database::open(&config.resolve_path(&settings.cache_path))?;
    let cache = SqliteLocationCache::new(Arc::new(db));
    let geocoder = NominatimGeocoder::new(&settings.user_agent, &settings.endpoint)?;
    let schedule = if settings.enabled {
        settings.schedule.clone()
    } else {
        RefreshSchedule::never()
    };

    let resolver = LocationResolver::new(
        cache,
        geocoder,
        schedule,
        Duration::from_millis(settings.min_delay_ms),
    );
    let report = resolver
        .resolve(data.locations(), Local::now().weekday())
        .await?;

    tracing::info!(
        "Resolved {} locations ({} new, {} unresolved)",
        report.resolved.len(),
        report.newly_cached.len(),
        report.unresolved.len()
    );
    Ok(report)
}
