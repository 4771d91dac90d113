//! Conversion driver tests against a scripted backend on a paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use common::{
    api_error, completed_now, processing, report, report_completed, report_failed, Check,
    FakeBackend,
};
use studio_client::conversion::{Conversion, PollConfig};
use studio_core::lifecycle::{
    ConversionState, FailureStage, Notice, GENERIC_FAILURE_MESSAGE, TIMEOUT_MESSAGE,
};
use studio_core::status::JobStatus;
use tokio::time::Instant;

const IMAGE: &str = "https://cdn.example/logo-1.png";

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

// ---------------------------------------------------------------------------
// Test: immediate completion
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn completed_submission_never_polls() {
    let backend = Arc::new(
        FakeBackend::new().with_submit(Ok(completed_now(Some("v.mp4"), Some("a.gif")))),
    );

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_matches!(&state, ConversionState::Completed(a) => {
        assert_eq!(a.video_url.as_deref(), Some("v.mp4"));
        assert_eq!(a.gif_url.as_deref(), Some("a.gif"));
    });
    assert_eq!(*backend.submit_calls.lock().unwrap(), vec![IMAGE.to_string()]);

    tokio::time::sleep(secs(120)).await;
    assert_eq!(backend.check_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: polling cadence
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn processing_job_is_checked_every_interval() {
    let backend = Arc::new(FakeBackend::new().with_checks(vec![
        Check::Report(report(JobStatus::Processing)),
        Check::Report(report(JobStatus::Processing)),
        Check::Report(report_completed("v.mp4")),
    ]));
    let start = Instant::now();

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_matches!(&state, ConversionState::Completed(a) if a.video_url.as_deref() == Some("v.mp4"));
    assert_eq!(backend.check_times(start), vec![secs(30), secs(60), secs(90)]);
    assert_eq!(backend.checked_job_ids(), vec!["J", "J", "J"]);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_polling_state() {
    let backend = Arc::new(FakeBackend::new());
    let conversion = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default());
    let mut rx = conversion.subscribe();

    let seen = rx
        .wait_for(|s| s.job_id().is_some())
        .await
        .unwrap()
        .clone();
    assert_eq!(
        seen,
        ConversionState::Polling {
            job_id: "J".to_string(),
            attempts: 0,
        }
    );

    tokio::time::sleep(secs(31)).await;
    assert_eq!(conversion.state().attempts(), 1);
    assert!(conversion.state().is_busy());
}

// ---------------------------------------------------------------------------
// Test: timeout
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn twenty_unfinished_checks_time_out() {
    let backend = Arc::new(FakeBackend::new());
    let start = Instant::now();

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_eq!(state, ConversionState::TimedOut);
    assert_eq!(state.notice(), Some(Notice::Alert(TIMEOUT_MESSAGE.to_string())));
    assert_eq!(backend.check_count(), 20);
    assert_eq!(start.elapsed(), secs(630));

    tokio::time::sleep(secs(300)).await;
    assert_eq!(backend.check_count(), 20);
}

#[tokio::test(start_paused = true)]
async fn failed_checks_count_toward_the_budget() {
    let backend = Arc::new(FakeBackend::new().with_checks(vec![
        Check::Error,
        Check::Error,
        Check::Error,
    ]));
    let config = PollConfig {
        interval: secs(5),
        max_attempts: 3,
    };

    let state = Conversion::start(Arc::clone(&backend), IMAGE, config)
        .finish()
        .await;

    assert_eq!(state, ConversionState::TimedOut);
    assert_eq!(backend.check_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn failed_check_is_retried_on_next_tick() {
    let backend = Arc::new(FakeBackend::new().with_checks(vec![
        Check::Error,
        Check::Report(report_completed("v.mp4")),
    ]));

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_matches!(state, ConversionState::Completed(_));
    assert_eq!(backend.check_count(), 2);
}

// ---------------------------------------------------------------------------
// Test: job failure
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn failed_job_stops_polling_with_alert() {
    let backend = Arc::new(FakeBackend::new().with_checks(vec![
        Check::Report(report(JobStatus::Processing)),
        Check::Report(report_failed("E")),
    ]));

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_eq!(
        state,
        ConversionState::Failed {
            stage: FailureStage::Job,
            reason: "E".to_string(),
        }
    );
    assert_eq!(
        state.notice(),
        Some(Notice::Alert("Video conversion failed: E".to_string()))
    );

    tokio::time::sleep(secs(120)).await;
    assert_eq!(backend.check_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn first_terminal_reply_wins_over_slower_check() {
    // Check 1 is still in flight when check 2 reports the failure.
    let backend = Arc::new(FakeBackend::new().with_checks(vec![
        Check::Delayed(secs(45), report_completed("late.mp4")),
        Check::Report(report_failed("E")),
    ]));
    let start = Instant::now();

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_matches!(state, ConversionState::Failed { stage: FailureStage::Job, ref reason } if reason == "E");
    assert_eq!(start.elapsed(), secs(60));
}

// ---------------------------------------------------------------------------
// Test: cancellation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_polling() {
    let backend = Arc::new(FakeBackend::new());
    let conversion = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default());

    tokio::time::sleep(secs(65)).await;
    assert_eq!(backend.check_count(), 2);

    drop(conversion);
    tokio::time::sleep(secs(600)).await;
    assert_eq!(backend.check_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancelled_conversion_ends_idle() {
    let backend = Arc::new(FakeBackend::new());
    let conversion = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default());

    tokio::time::sleep(secs(35)).await;
    conversion.cancel();
    let state = conversion.finish().await;

    assert_eq!(state, ConversionState::Idle);
    tokio::time::sleep(secs(600)).await;
    assert_eq!(backend.check_count(), 1);
}

// ---------------------------------------------------------------------------
// Test: submission failures
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn submit_error_uses_server_message() {
    let backend = Arc::new(
        FakeBackend::new().with_submit(Err(api_error(400, Some("Image URL unreachable")))),
    );

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_eq!(
        state.notice(),
        Some(Notice::Inline("Image URL unreachable".to_string()))
    );
    assert_eq!(backend.check_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn submit_error_without_message_is_generic() {
    let backend = Arc::new(FakeBackend::new().with_submit(Err(api_error(502, None))));

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_eq!(
        state,
        ConversionState::Failed {
            stage: FailureStage::Submission,
            reason: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn processing_without_job_id_fails() {
    let mut reply = processing("J");
    reply.job_id = None;
    let backend = Arc::new(FakeBackend::new().with_submit(Ok(reply)));

    let state = Conversion::start(Arc::clone(&backend), IMAGE, PollConfig::default())
        .finish()
        .await;

    assert_matches!(state, ConversionState::Failed { stage: FailureStage::Submission, .. });
    tokio::time::sleep(secs(60)).await;
    assert_eq!(backend.check_count(), 0);
}
