// src/supervisor/clock.rs

use std::time::{Duration, Instant};

use crate::process::BoxFuture;

/// Time source for the supervisor's polling loop.
///
/// Production uses [`TokioClock`]; tests inject a clock whose `sleep`
/// advances virtual time and returns immediately.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
