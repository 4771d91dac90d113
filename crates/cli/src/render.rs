//! Plain-text rendering of the gallery and conversion progress.

use std::fmt::Write;

use studio_core::lifecycle::{ConversionState, Notice};
use studio_core::logo::Logo;

/// One gallery row: id, image URL, any attached artifacts, then the
/// generation date.
pub fn logo_line(logo: &Logo) -> String {
    let mut line = format!("#{:<3} {}", logo.id(), logo.url());
    if let Some(video) = logo.video_url() {
        let _ = write!(line, "  video: {video}");
    }
    if let Some(gif) = logo.gif_url() {
        let _ = write!(line, "  gif: {gif}");
    }
    let _ = write!(line, "  Generated on {}", logo.generated_at().format("%Y-%m-%d"));
    line
}

pub fn gallery(logos: &[Logo]) -> String {
    if logos.is_empty() {
        return "No logos generated yet.".to_string();
    }
    logos.iter().map(logo_line).collect::<Vec<_>>().join("\n")
}

pub fn notice(notice: &Notice) -> String {
    match notice {
        Notice::Inline(message) => format!("error: {message}"),
        Notice::Alert(message) => format!("ALERT: {message}"),
    }
}

/// Progress line for a conversion state.
pub fn state_line(state: &ConversionState) -> String {
    match state {
        ConversionState::Idle => "Conversion cancelled.".to_string(),
        ConversionState::Submitting => "Converting to video...".to_string(),
        ConversionState::Polling { job_id, attempts: 0 } => {
            format!("Job {job_id} accepted, waiting for the video...")
        }
        ConversionState::Polling { job_id, attempts } => {
            format!("Job {job_id} still processing (check {attempts})")
        }
        ConversionState::Completed(artifacts) if artifacts.is_empty() => {
            "Conversion finished without a video or GIF.".to_string()
        }
        ConversionState::Completed(artifacts) => {
            let mut line = "Conversion complete.".to_string();
            if let Some(video) = &artifacts.video_url {
                let _ = write!(line, " video: {video}");
            }
            if let Some(gif) = &artifacts.gif_url {
                let _ = write!(line, " gif: {gif}");
            }
            line
        }
        ConversionState::Failed { .. } | ConversionState::TimedOut => state
            .notice()
            .map(|n| notice(&n))
            .unwrap_or_default(),
    }
}
