//! Temperature/humidity station: samples a DHT-style sensor on demand,
//! blinks an LED when a reading leaves its acceptable range, appends every
//! reading to a CSV log and serves all of it over a small HTTP API.

pub mod api;
pub mod error;
pub mod hardware;
pub mod models;
pub mod settings;
pub mod station;
pub mod store;
mod utils;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use log::info;

use hardware::SystemClock;
use settings::Settings;
use station::{ReadingService, Station};
use store::LogStore;

pub use error::StationError;

/// Wires the configured collaborators into a running station. Fails if the
/// sensor or LED cannot be claimed or the log cannot be created.
pub fn build_station(settings: &Settings) -> Result<Station> {
    let sensor = hardware::build_sensor(&settings.hardware).context("failed to open sensor")?;
    let actuator =
        hardware::build_actuator(&settings.hardware).context("failed to set up alert LED")?;

    let service = ReadingService::new(
        sensor,
        actuator,
        Box::new(SystemClock),
        LogStore::new(settings.log_file.clone()),
        settings.sampling(),
    );

    Station::spawn(service)
}

pub fn run() -> Result<()> {
    // RUST_LOG wins over the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("envwatch starting up...");

    let settings = Settings::from_env()?;
    info!(
        "Ranges: temperature {} °C, humidity {} %; blink {}x{}ms; {} sensor attempts, {}ms backoff",
        settings.temperature_range,
        settings.humidity_range,
        settings.blink.cycles,
        settings.blink.interval_ms,
        settings.retry.attempts,
        settings.retry.backoff_ms
    );
    info!("Reading log at {}", settings.log_file.display());

    let station = build_station(&settings)?;

    actix_web::rt::System::new().block_on(serve(station, &settings.bind))
}

async fn serve(station: Station, bind: &str) -> Result<()> {
    let station = web::Data::new(station);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(station.clone())
            .configure(api::configure)
    })
    .bind(bind)
    .with_context(|| format!("failed to bind HTTP server to {bind}"))?;

    info!("Listening on http://{bind}");
    server.run().await.context("HTTP server failed")
}
