use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chalk_journal::RetryPolicy;
use chalk_journal::retry;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tokio::time::Instant;

fn policy(attempts: u32, initial_ms: u64, multiplier: f64) -> RetryPolicy {
    RetryPolicy::new(attempts, Duration::from_millis(initial_ms), multiplier).unwrap()
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(6)]
#[tokio::test(start_paused = true)]
async fn always_failing_runs_exactly_max_attempts(#[case] attempts: u32) {
    let calls = AtomicU32::new(0);
    let result: Result<(), String> = retry::run(&policy(attempts, 100, 2.0), || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { Err(format!("failure {n}")) }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), attempts);
    assert_eq!(result.unwrap_err(), format!("failure {attempts}"));
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(5)]
#[tokio::test(start_paused = true)]
async fn success_on_attempt_k_stops_there(#[case] k: u32) {
    let calls = AtomicU32::new(0);
    let result: Result<u32, String> = retry::run(&policy(5, 100, 2.0), || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { if n == k { Ok(n * 10) } else { Err("nope".to_string()) } }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), k);
    assert_eq!(result.unwrap(), k * 10);
}

#[tokio::test(start_paused = true)]
async fn fail_fail_succeed_timeline() {
    let start = Instant::now();
    let seen = Mutex::new(Vec::new());

    let result: Result<&str, &str> = retry::run(&policy(3, 1000, 2.0), || {
        let mut seen = seen.lock().unwrap();
        seen.push(start.elapsed());
        let attempt = seen.len();
        async move { if attempt < 3 { Err("boom") } else { Ok("done") } }
    })
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(
        seen.into_inner().unwrap(),
        vec![
            Duration::ZERO,
            Duration::from_millis(1000),
            Duration::from_millis(3000),
        ]
    );
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn delays_between_attempts_follow_policy() {
    let p = policy(5, 250, 3.0);
    let start = Instant::now();
    let seen = Mutex::new(Vec::new());

    let _: Result<(), &str> = retry::run(&p, || {
        seen.lock().unwrap().push(start.elapsed());
        async { Err("fail") }
    })
    .await;

    let seen = seen.into_inner().unwrap();
    for k in 2..=5_usize {
        let gap = seen[k - 1] - seen[k - 2];
        assert_eq!(gap, p.delay_before(u32::try_from(k).unwrap()), "before attempt {k}");
    }
}

#[tokio::test(start_paused = true)]
async fn single_attempt_never_sleeps() {
    let start = Instant::now();
    let result: Result<(), &str> = retry::run(&policy(1, 60_000, 2.0), || async { Err("once") }).await;
    assert_eq!(result, Err("once"));
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn calls_are_independent() {
    let p = policy(2, 500, 2.0);
    for _ in 0..3 {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let _: Result<(), &str> = retry::run(&p, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("fail") }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_calls_keep_their_own_schedule() {
    let fast = policy(3, 100, 2.0);
    let slow = policy(4, 250, 3.0);
    let fast_calls = AtomicU32::new(0);
    let slow_calls = AtomicU32::new(0);
    let start = Instant::now();

    let fast_run = async {
        let result: Result<(), &str> = retry::run(&fast, || {
            fast_calls.fetch_add(1, Ordering::SeqCst);
            async { Err("fast fails") }
        })
        .await;
        (result, start.elapsed())
    };
    let slow_run = async {
        let result = retry::run(&slow, || {
            let n = slow_calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if n < 3 { Err("not yet") } else { Ok(n) } }
        })
        .await;
        (result, start.elapsed())
    };

    let ((fast_result, fast_elapsed), (slow_result, slow_elapsed)) =
        tokio::join!(fast_run, slow_run);

    assert_eq!(fast_result, Err("fast fails"));
    assert_eq!(fast_calls.load(Ordering::SeqCst), 3);
    assert_eq!(fast_elapsed, Duration::from_millis(100 + 200));

    assert_eq!(slow_result, Ok(3));
    assert_eq!(slow_calls.load(Ordering::SeqCst), 3);
    assert_eq!(slow_elapsed, Duration::from_millis(250 + 750));
}
