//! Subcommand drivers.
//!
//! Progress goes to stdout as plain lines unless `--json` was given, in
//! which case only the final JSON document is printed. Ctrl-C during a
//! conversion drops it, which stops status polling.

use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use studio_client::api::StudioApi;
use studio_client::conversion::{Conversion, PollConfig};
use studio_client::studio::Studio;
use studio_core::lifecycle::ConversionState;
use studio_core::store::LogoStore;
use tokio::sync::watch;

use crate::args::GenerateArgs;
use crate::render;

pub async fn generate(
    api: Arc<StudioApi>,
    poll: PollConfig,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    let mut studio = Studio::new(api, poll);
    let request = args.to_request();

    tracing::info!(
        prompt = %request.prompt,
        width = request.width,
        height = request.height,
        "Generating logos",
    );
    studio
        .generate(&request)
        .await
        .context("Logo generation failed")?;

    if !args.json {
        println!("{}", render::gallery(&studio.logos()));
    }

    let mut conversion = None;
    if let Some(id) = args.convert {
        studio.select(id)?;
        let rx = studio.convert_selected()?;
        if !args.json {
            tokio::spawn(print_progress(rx));
        }

        let finished = tokio::select! {
            outcome = studio.finish_conversion() => Some(outcome?),
            _ = tokio::signal::ctrl_c() => None,
        };
        let state = match finished {
            Some(outcome) => outcome.state,
            None => {
                tracing::info!(logo_id = id, "Interrupted, conversion discarded");
                studio.back();
                ConversionState::Idle
            }
        };
        if !args.json {
            println!("{}", render::state_line(&state));
        }
        conversion = Some(state);
    }

    if args.json {
        let logos = studio.logos();
        let doc = json!({
            "logos": &*logos,
            "conversion": conversion,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else if conversion.is_some() {
        println!("{}", render::gallery(&studio.logos()));
    }
    Ok(())
}

pub async fn convert(
    api: Arc<StudioApi>,
    poll: PollConfig,
    image_url: String,
    json: bool,
) -> anyhow::Result<()> {
    let conversion = Conversion::start(api, image_url, poll);
    if !json {
        tokio::spawn(print_progress(conversion.subscribe()));
    }

    // Dropping the unfinished `finish` future drops the handle.
    let state = tokio::select! {
        state = conversion.finish() => state,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, conversion cancelled");
            ConversionState::Idle
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", render::state_line(&state));
    }

    if state.notice().is_some() {
        anyhow::bail!("Conversion did not complete");
    }
    Ok(())
}

pub fn sample(count: usize, json: bool) -> anyhow::Result<()> {
    let mut store = LogoStore::new();
    for _ in 0..count {
        store.add_sample();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&*store.snapshot())?);
    } else {
        println!("{}", render::gallery(&store.snapshot()));
    }
    Ok(())
}

/// Print every intermediate state until the conversion ends.
async fn print_progress(mut rx: watch::Receiver<ConversionState>) {
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if state.is_terminal() || state == ConversionState::Idle {
            break;
        }
        println!("{}", render::state_line(&state));
    }
}
