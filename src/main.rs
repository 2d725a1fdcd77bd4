use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_client::HttpGateway;
use clinic_core::config::{analytics_window_from_env_value, base_url_from_env_value};
use clinic_core::constants::{ANALYTICS_DAYS_ENV, BASE_URL_ENV};
use clinic_core::render::Board;
use clinic_core::{ClientConfig, Controller};

/// Main entry point for the clinic queue board
///
/// Loads patients, appointments and analytics from the gateway in one pass and prints every
/// view: the error banner (if any), the appointment queue, the patient roster and the dashboard.
///
/// # Environment Variables
/// - `CLINIC_API_BASE_URL`: gateway origin (default: "http://localhost:8000")
/// - `CLINIC_ANALYTICS_DAYS`: dashboard window, 7, 14 or 30 (default: 14)
///
/// A failed load still prints the board, with whatever loaded, and exits non-zero.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_run=info".parse()?)
                .add_directive("clinic_core=info".parse()?)
                .add_directive("api_client=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_url = base_url_from_env_value(std::env::var(BASE_URL_ENV).ok())?;
    let window = analytics_window_from_env_value(std::env::var(ANALYTICS_DAYS_ENV).ok())?;
    let cfg = ClientConfig::new(&base_url, window)?;

    tracing::info!("++ Loading clinic board from {}", cfg.base_url());

    let controller = Controller::new(HttpGateway::new(&cfg)?, cfg.analytics_window());
    let loaded = controller.initial_load().await;

    print!("{}", Board(&controller.snapshot()));
    loaded?;

    Ok(())
}
