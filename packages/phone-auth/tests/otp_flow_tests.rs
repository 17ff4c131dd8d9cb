//! Integration tests for the code entry flow.
//!
//! Time is driven by tokio's paused clock. The countdown starts at t=0 and
//! ticks on whole seconds, so tests sample at half seconds to avoid ties.

mod common;

use common::{elapse, TestHarness, PHONE};
use phone_auth::domains::auth::{INVALID_CODE, SEND_FAILED};
use phone_auth::kernel::{BackendCall, MockAuthBackend, MockReply};
use phone_auth::OtpEvent;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio_test::{assert_pending, assert_ready};

// ============================================================================
// Countdown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn starts_with_full_countdown() {
    let harness = TestHarness::new();
    let flow = harness.deps.otp_flow(PHONE);

    let state = flow.state();
    assert_eq!(state.code, "");
    assert_eq!(state.remaining_seconds, 60);
    assert!(!state.is_resend_available);
    assert!(flow.is_counting_down());
    assert_eq!(flow.phone(), PHONE);
}

#[tokio::test(start_paused = true)]
async fn resend_opens_after_exactly_sixty_ticks() {
    let harness = TestHarness::new();
    let flow = harness.deps.otp_flow(PHONE);

    elapse(59_500).await;
    let state = flow.state();
    assert_eq!(state.remaining_seconds, 1);
    assert!(!state.is_resend_available);

    elapse(1_000).await;
    let state = flow.state();
    assert_eq!(state.remaining_seconds, 0);
    assert!(state.is_resend_available);
    assert!(!flow.is_counting_down());
}

#[tokio::test(start_paused = true)]
async fn observers_see_each_tick() {
    let harness = TestHarness::new();
    let flow = harness.deps.otp_flow(PHONE);
    let mut states = flow.subscribe_state();
    assert!(!states.has_changed().unwrap());

    elapse(1_500).await;

    assert!(states.has_changed().unwrap());
    assert_eq!(states.borrow_and_update().remaining_seconds, 59);
}

// ============================================================================
// Submitting
// ============================================================================

#[tokio::test(start_paused = true)]
async fn incomplete_code_never_reaches_backend() {
    let harness = TestHarness::new();
    let flow = harness.deps.otp_flow(PHONE);

    flow.on_code_changed("12345");
    flow.submit().await;

    assert!(flow.state().error.is_some());
    assert_eq!(harness.backend.verify_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn wrong_code_sets_error_and_keeps_countdown() {
    let backend = MockAuthBackend::new().with_verify_reply(MockReply::Reject);
    let harness = TestHarness::with_backend(backend);
    let flow = harness.deps.otp_flow(PHONE);
    let mut events = flow.subscribe_events();

    flow.on_code_changed("000000");
    flow.submit().await;

    let state = flow.state();
    assert_eq!(state.error.as_deref(), Some(INVALID_CODE));
    assert!(!state.is_loading);
    assert!(!state.is_verified);
    assert_eq!(state.code, "000000");
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(
        harness.backend.calls(),
        vec![BackendCall::VerifyCode {
            phone: PHONE.to_string(),
            code: "000000".to_string()
        }]
    );

    elapse(5_500).await;
    assert_eq!(flow.state().remaining_seconds, 55);
}

#[tokio::test(start_paused = true)]
async fn correct_code_verifies_once_and_stops_countdown() {
    let harness = TestHarness::new();
    let flow = harness.deps.otp_flow(PHONE);
    let mut events = flow.subscribe_events();

    elapse(3_500).await;
    flow.on_code_changed("123456");
    flow.submit().await;

    assert_eq!(events.try_recv().unwrap(), OtpEvent::Verified);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    let state = flow.state();
    assert!(state.is_verified);
    assert!(!state.is_loading);
    assert_eq!(state.code, "123456");
    assert_eq!(state.remaining_seconds, 0);
    assert!(!flow.is_counting_down());

    elapse(120_000).await;
    let state = flow.state();
    assert_eq!(state.remaining_seconds, 0);
    assert!(!state.is_resend_available);

    // Terminal: nothing else goes through.
    flow.submit().await;
    flow.resend_code().await;
    flow.on_code_changed("000000");
    assert_eq!(harness.backend.verify_calls(), 1);
    assert_eq!(harness.backend.send_calls(), 0);
    assert_eq!(flow.state().code, "123456");
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn submit_while_verifying_is_ignored() {
    let backend = MockAuthBackend::new().with_latency(Duration::from_millis(800));
    let harness = TestHarness::with_backend(backend);
    let flow = harness.deps.otp_flow(PHONE);
    flow.on_code_changed("123456");

    let mut first = tokio_test::task::spawn(flow.submit());
    assert_pending!(first.poll());
    assert!(flow.state().is_loading);

    flow.submit().await;
    assert_eq!(harness.backend.verify_calls(), 1);

    elapse(1_000).await;
    assert_ready!(first.poll());
    assert!(flow.state().is_verified);
    assert_eq!(harness.backend.verify_calls(), 1);
}

// ============================================================================
// Resending
// ============================================================================

#[tokio::test(start_paused = true)]
async fn resend_before_countdown_ends_is_ignored() {
    let harness = TestHarness::new();
    let flow = harness.deps.otp_flow(PHONE);

    flow.resend_code().await;
    elapse(30_500).await;
    flow.resend_code().await;

    assert_eq!(harness.backend.send_calls(), 0);
    assert!(!flow.state().is_resend_loading);
}

#[tokio::test(start_paused = true)]
async fn resend_clears_code_and_restarts_countdown() {
    let harness = TestHarness::new();
    let flow = harness.deps.otp_flow(PHONE);
    let mut events = flow.subscribe_events();

    elapse(60_500).await;
    flow.on_code_changed("12");
    flow.resend_code().await;

    assert_eq!(events.try_recv().unwrap(), OtpEvent::CodeResent);
    assert_eq!(
        harness.backend.calls(),
        vec![BackendCall::SendCode {
            phone: PHONE.to_string()
        }]
    );
    let state = flow.state();
    assert_eq!(state.code, "");
    assert!(!state.is_complete);
    assert!(!state.is_resend_loading);
    assert_eq!(state.remaining_seconds, 60);
    assert!(!state.is_resend_available);

    // One countdown only: exactly ten ticks in ten seconds.
    elapse(10_500).await;
    assert_eq!(flow.state().remaining_seconds, 50);
}

#[tokio::test(start_paused = true)]
async fn failed_resend_stays_available_for_retry() {
    let backend = MockAuthBackend::new()
        .with_send_reply(MockReply::Fail("gateway timeout".to_string()))
        .with_send_reply(MockReply::Accept);
    let harness = TestHarness::with_backend(backend);
    let flow = harness.deps.otp_flow(PHONE);
    let mut events = flow.subscribe_events();

    elapse(60_500).await;
    flow.resend_code().await;

    let state = flow.state();
    assert_eq!(state.error.as_deref(), Some(SEND_FAILED));
    assert!(state.is_resend_available);
    assert!(!state.is_resend_loading);
    assert_eq!(state.remaining_seconds, 0);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    flow.resend_code().await;
    assert_eq!(harness.backend.send_calls(), 2);
    assert_eq!(events.try_recv().unwrap(), OtpEvent::CodeResent);
    assert_eq!(flow.state().error, None);
}

#[tokio::test(start_paused = true)]
async fn submit_during_resend_is_ignored() {
    let backend = MockAuthBackend::new().with_latency(Duration::from_millis(800));
    let harness = TestHarness::with_backend(backend);
    let flow = harness.deps.otp_flow(PHONE);

    elapse(60_500).await;
    flow.on_code_changed("123456");
    let mut resend = tokio_test::task::spawn(flow.resend_code());
    assert_pending!(resend.poll());
    assert!(flow.state().is_resend_loading);

    flow.submit().await;
    assert_eq!(harness.backend.verify_calls(), 0);
    assert!(!flow.state().is_loading);

    elapse(1_000).await;
    assert_ready!(resend.poll());
    assert_eq!(harness.backend.send_calls(), 1);
    assert!(!flow.state().is_resend_loading);
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn close_stops_countdown() {
    let harness = TestHarness::new();
    let flow = harness.deps.otp_flow(PHONE);

    elapse(2_500).await;
    flow.close();
    elapse(10_000).await;

    assert!(flow.is_closed());
    assert!(!flow.is_counting_down());
    assert_eq!(flow.state().remaining_seconds, 58);
}

#[tokio::test(start_paused = true)]
async fn close_during_verify_discards_result() {
    let backend = MockAuthBackend::new().with_latency(Duration::from_millis(800));
    let harness = TestHarness::with_backend(backend);
    let flow = harness.deps.otp_flow(PHONE);
    let mut events = flow.subscribe_events();
    flow.on_code_changed("123456");

    let mut pending = tokio_test::task::spawn(flow.submit());
    assert_pending!(pending.poll());

    flow.close();
    assert_ready!(pending.poll());
    elapse(1_000).await;

    let state = flow.state();
    assert!(!state.is_verified);
    assert!(state.is_loading);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}
