use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use zapret_adapter::process::BoxFuture;
use zapret_adapter::supervisor::Clock;

/// Virtual clock: `sleep` advances time and returns immediately.
///
/// Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    inner: Arc<Mutex<Timeline>>,
}

#[derive(Debug, Default)]
struct Timeline {
    elapsed: Duration,
    sleeps: usize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            inner: Arc::new(Mutex::new(Timeline::default())),
        }
    }

    /// Virtual time passed since construction.
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().unwrap().elapsed
    }

    /// Number of `sleep` calls so far.
    pub fn sleeps(&self) -> usize {
        self.inner.lock().unwrap().sleeps
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        {
            let mut timeline = self.inner.lock().unwrap();
            timeline.elapsed += duration;
            timeline.sleeps += 1;
        }
        Box::pin(async {})
    }
}
