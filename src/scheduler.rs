//! Pacing and wall-clock access for the pipeline.
//!
//! Stage delays are cosmetic; routing them through [`Scheduler`] lets tests
//! drive a full run without sleeping.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::OffsetDateTime;

pub trait Scheduler {
    /// Block until the given delay has elapsed.
    fn pause(&mut self, delay: Duration);
    fn now(&self) -> OffsetDateTime;
}

/// Sleeps the calling thread. With pacing off every pause returns at once.
#[derive(Debug, Clone, Copy)]
pub struct SystemScheduler {
    pace: bool,
}

impl SystemScheduler {
    pub fn new(pace: bool) -> Self {
        Self { pace }
    }
}

impl Default for SystemScheduler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Scheduler for SystemScheduler {
    fn pause(&mut self, delay: Duration) {
        if self.pace && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Debug)]
struct ManualState {
    now: OffsetDateTime,
    pauses: Vec<Duration>,
}

/// Records every pause and advances a fake clock instead of sleeping.
///
/// Clones share state, so a test can keep a handle while the pipeline owns
/// another.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::starting_at(OffsetDateTime::UNIX_EPOCH)
    }

    pub fn starting_at(now: OffsetDateTime) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                now,
                pauses: Vec::new(),
            })),
        }
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pauses
            .clone()
    }

    pub fn total_paused(&self) -> Duration {
        self.pauses().iter().sum()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn pause(&mut self, delay: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.now += delay;
        state.pauses.push(delay);
    }

    fn now(&self) -> OffsetDateTime {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_advances_clock_without_sleeping() {
        let handle = ManualScheduler::new();
        let mut sched = handle.clone();
        sched.pause(Duration::from_millis(1500));
        sched.pause(Duration::from_millis(1000));

        assert_eq!(handle.pauses().len(), 2);
        assert_eq!(handle.total_paused(), Duration::from_millis(2500));
        assert_eq!(
            handle.now(),
            OffsetDateTime::UNIX_EPOCH + Duration::from_millis(2500)
        );
    }
}
