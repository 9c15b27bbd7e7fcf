// src/supervisor/wait.rs

use std::time::Duration;

use tracing::trace;

use super::clock::Clock;

/// Poll `done` every `interval` until it returns true or `timeout` elapses.
///
/// The check after the deadline is authoritative: if it passes the wait
/// succeeds even though time ran out. Never sleeps past the first check that
/// passes.
pub async fn wait_until<F>(clock: &dyn Clock, timeout: Duration, interval: Duration, mut done: F) -> bool
where
    F: FnMut() -> bool,
{
    let started = clock.now();
    let mut attempts = 0u32;

    while clock.now().duration_since(started) < timeout {
        attempts += 1;
        if done() {
            trace!(attempts, "wait condition met");
            return true;
        }
        clock.sleep(interval).await;
    }

    let met = done();
    trace!(attempts = attempts + 1, met, "wait deadline reached");
    met
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Instant;

    use super::*;
    use crate::process::BoxFuture;

    /// Sleeping advances virtual time instantly.
    struct StepClock {
        origin: Instant,
        elapsed: Mutex<Duration>,
    }

    impl StepClock {
        fn new() -> Self {
            Self {
                origin: Instant::now(),
                elapsed: Mutex::new(Duration::ZERO),
            }
        }

        fn elapsed(&self) -> Duration {
            *self.elapsed.lock().unwrap()
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> Instant {
            self.origin + self.elapsed()
        }

        fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
            *self.elapsed.lock().unwrap() += duration;
            Box::pin(async {})
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);
    const INTERVAL: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn returns_immediately_when_already_done() {
        let clock = StepClock::new();
        assert!(wait_until(&clock, TIMEOUT, INTERVAL, || true).await);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn succeeds_once_condition_flips() {
        let clock = StepClock::new();
        let mut checks = 0;
        let ok = wait_until(&clock, TIMEOUT, INTERVAL, || {
            checks += 1;
            checks == 4
        })
        .await;
        assert!(ok);
        assert_eq!(clock.elapsed(), INTERVAL * 3);
    }

    #[tokio::test]
    async fn gives_up_at_the_deadline() {
        let clock = StepClock::new();
        let mut checks = 0;
        let ok = wait_until(&clock, TIMEOUT, INTERVAL, || {
            checks += 1;
            false
        })
        .await;
        assert!(!ok);
        assert_eq!(clock.elapsed(), TIMEOUT);
        // 25 in-loop checks plus the final one.
        assert_eq!(checks, 26);
    }

    #[tokio::test]
    async fn final_check_after_deadline_decides() {
        let clock = StepClock::new();
        let mut checks = 0;
        let ok = wait_until(&clock, TIMEOUT, INTERVAL, || {
            checks += 1;
            checks == 26
        })
        .await;
        assert!(ok);
    }
}
