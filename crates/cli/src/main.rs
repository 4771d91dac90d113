//! `logo-studio` -- command-line front end for the logo generation backend.
//!
//! Generates logos from a prompt, lists the session gallery and converts
//! a logo into a short video, polling the backend until the job ends.
//!
//! # Environment variables
//!
//! | Variable                      | Default                 | Description                     |
//! |-------------------------------|-------------------------|---------------------------------|
//! | `STUDIO_API_URL`              | `http://localhost:8000` | Backend origin                  |
//! | `STUDIO_POLL_INTERVAL_SECS`   | `30`                    | Seconds between status checks   |
//! | `STUDIO_POLL_MAX_ATTEMPTS`    | `20`                    | Checks before timing out        |
//! | `STUDIO_REQUEST_TIMEOUT_SECS` | `120`                   | Conversion HTTP timeout         |
//! | `STUDIO_GENERATE_TIMEOUT_SECS`| `900`                   | Logo generation HTTP timeout    |
//! | `RUST_LOG`                    | `studio_cli=info,...`   | Log filter                      |

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use studio_cli::args::{Args, Command};
use studio_cli::commands;
use studio_client::api::StudioApi;
use studio_client::config::StudioConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_cli=info,studio_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = StudioConfig::from_env().context("Invalid configuration")?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }

    tracing::info!(
        api_url = %config.api_url,
        poll_interval_secs = config.poll_interval.as_secs(),
        max_poll_attempts = config.max_poll_attempts,
        "Starting logo-studio",
    );

    let api = Arc::new(StudioApi::from_config(&config).context("Failed to build HTTP client")?);
    let poll = config.poll_config();

    match args.command {
        Command::Generate(generate) => commands::generate(api, poll, generate).await,
        Command::Convert { image_url, json } => commands::convert(api, poll, image_url, json).await,
        Command::Sample { count, json } => commands::sample(count, json),
    }
}
