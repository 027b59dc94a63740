use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use proptest::prelude::*;
use rstest::rstest;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{jittered, BackoffExecutor, BackoffPolicy, Classification, DelaySchedule};
use crate::error::ExtractError;

fn policy(max_attempts: usize) -> BackoffPolicy {
    BackoffPolicy::new(
        max_attempts,
        Duration::from_millis(100),
        2.0,
        Duration::from_millis(1_000),
        false,
    )
    .unwrap()
}

fn transient() -> ExtractError {
    ExtractError::Transport("connection reset".to_string())
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(5)]
#[tokio::test(start_paused = true)]
async fn always_failing_action_runs_max_attempts(#[case] max_attempts: usize) {
    let calls = AtomicUsize::new(0);
    let executor = BackoffExecutor::new(policy(max_attempts));

    let result: Result<(), _> = executor
        .execute(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), max_attempts);
    match result {
        Err(ExtractError::RetryExceeded {
            attempts,
            last_error,
        }) => {
            assert_eq!(attempts, max_attempts);
            assert!(last_error.contains("connection reset"));
        }
        other => panic!("expected RetryExceeded, got {other:?}"),
    }
}

#[rstest]
#[case(1, Duration::ZERO)]
#[case(2, Duration::from_millis(100))]
#[case(4, Duration::from_millis(700))]
#[tokio::test(start_paused = true)]
async fn success_on_attempt_k_stops_retrying(#[case] k: usize, #[case] expected_wait: Duration) {
    let calls = AtomicUsize::new(0);
    let executor = BackoffExecutor::new(policy(5));
    let start = Instant::now();

    let result = executor
        .execute(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < k {
                    Err(transient())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), k);
    assert_eq!(calls.load(Ordering::SeqCst), k);
    assert_eq!(start.elapsed(), expected_wait);
}

#[tokio::test(start_paused = true)]
async fn terminal_failure_aborts_after_one_attempt() {
    let calls = AtomicUsize::new(0);
    let executor = BackoffExecutor::new(policy(5));
    let start = Instant::now();

    let result: Result<(), _> = executor
        .execute(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ExtractError::InvalidRequest("bad header".to_string())) }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(result, Err(ExtractError::InvalidRequest(_))));
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn custom_classifier_overrides_default() {
    let calls = AtomicUsize::new(0);
    let executor =
        BackoffExecutor::new(policy(5)).with_classifier(|_: &ExtractError| Classification::Terminal);

    let result: Result<(), _> = executor
        .execute(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(result, Err(ExtractError::Transport(_))));
}

#[tokio::test(start_paused = true)]
async fn waits_grow_by_multiplier_until_capped() {
    let stamps = Mutex::new(Vec::new());
    let policy = BackoffPolicy::new(
        6,
        Duration::from_millis(100),
        3.0,
        Duration::from_millis(1_000),
        false,
    )
    .unwrap();
    let executor = BackoffExecutor::new(policy);

    let _: Result<(), _> = executor
        .execute(|| {
            stamps.lock().unwrap().push(Instant::now());
            async { Err(transient()) }
        })
        .await;

    let stamps = stamps.into_inner().unwrap();
    let gaps: Vec<Duration> = stamps.windows(2).map(|w| w[1] - w[0]).collect();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(100),
            Duration::from_millis(300),
            Duration::from_millis(900),
            Duration::from_millis(1_000),
            Duration::from_millis(1_000),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn jittered_waits_never_exceed_nominal_delay() {
    let stamps = Mutex::new(Vec::new());
    let policy = BackoffPolicy::new(
        6,
        Duration::from_millis(100),
        3.0,
        Duration::from_millis(1_000),
        true,
    )
    .unwrap();
    let nominal: Vec<Duration> = policy.schedule().take(5).collect();
    let executor = BackoffExecutor::new(policy);

    let result: Result<(), _> = executor
        .execute(|| {
            stamps.lock().unwrap().push(Instant::now());
            async { Err(transient()) }
        })
        .await;

    assert!(matches!(
        result,
        Err(ExtractError::RetryExceeded { attempts: 6, .. })
    ));
    let stamps = stamps.into_inner().unwrap();
    assert_eq!(stamps.len(), 6);
    for (gap, limit) in stamps.windows(2).map(|w| w[1] - w[0]).zip(nominal) {
        assert!(gap <= limit, "waited {gap:?}, nominal delay {limit:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_wait_returns_promptly() {
    let cancel = CancellationToken::new();
    let policy = BackoffPolicy::new(
        3,
        Duration::from_secs(10),
        2.0,
        Duration::from_secs(60),
        false,
    )
    .unwrap();
    let executor = BackoffExecutor::new(policy).with_cancellation(cancel.clone());
    let calls = Arc::new(AtomicUsize::new(0));

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let result: Result<(), _> = executor
        .execute(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

    assert!(matches!(result, Err(ExtractError::Cancelled(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_attempt_abandons_action() {
    let cancel = CancellationToken::new();
    let executor = BackoffExecutor::new(policy(3)).with_cancellation(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let result: Result<(), _> = executor
        .execute(|| std::future::pending::<Result<(), ExtractError>>())
        .await;

    assert!(matches!(result, Err(ExtractError::Cancelled(_))));
}

#[tokio::test]
async fn already_cancelled_token_skips_action() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let calls = AtomicUsize::new(0);
    let executor = BackoffExecutor::new(policy(3)).with_cancellation(cancel);

    let result: Result<(), _> = executor
        .execute(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

    assert!(matches!(result, Err(ExtractError::Cancelled(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case(0, 100, 2.0, 1_000)]
#[case(3, 100, 0.5, 1_000)]
#[case(3, 100, f64::NAN, 1_000)]
#[case(3, 2_000, 2.0, 1_000)]
fn invalid_policies_are_rejected(
    #[case] attempts: usize,
    #[case] initial_ms: u64,
    #[case] multiplier: f64,
    #[case] max_ms: u64,
) {
    let result = BackoffPolicy::new(
        attempts,
        Duration::from_millis(initial_ms),
        multiplier,
        Duration::from_millis(max_ms),
        true,
    );
    assert!(matches!(result, Err(ExtractError::Config(_))));
}

#[test]
fn default_policy_is_valid() {
    let defaults = BackoffPolicy::defaults();
    let rebuilt = BackoffPolicy::new(
        defaults.max_attempts(),
        defaults.initial_delay(),
        defaults.multiplier(),
        defaults.max_delay(),
        defaults.jitter(),
    )
    .unwrap();
    assert_eq!(rebuilt, defaults);
}

#[test]
fn schedule_starts_at_initial_delay() {
    let delays: Vec<Duration> = DelaySchedule::new(
        Duration::from_millis(200),
        2.0,
        Duration::from_millis(2_000),
    )
    .take(6)
    .collect();
    let expected: Vec<Duration> = [200, 400, 800, 1_600, 2_000, 2_000]
        .into_iter()
        .map(Duration::from_millis)
        .collect();
    assert_eq!(delays, expected);
}

proptest! {
    #[test]
    fn schedule_is_monotonic_and_capped(
        initial_ms in 0u64..5_000,
        extra_ms in 0u64..60_000,
        multiplier in 1.0f64..10.0,
    ) {
        let max = Duration::from_millis(initial_ms + extra_ms);
        let initial = Duration::from_millis(initial_ms);
        let delays: Vec<Duration> = DelaySchedule::new(initial, multiplier, max).take(40).collect();

        prop_assert_eq!(delays[0], initial);
        for pair in delays.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        for delay in &delays {
            prop_assert!(*delay <= max);
        }
    }

    #[test]
    fn jitter_stays_within_nominal_delay(delay_ms in 0u64..120_000) {
        let delay = Duration::from_millis(delay_ms);
        prop_assert!(jittered(delay) <= delay);
    }
}
