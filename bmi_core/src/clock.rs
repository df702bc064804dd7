//! Timer clock driving `Workout::tick`.
//!
//! The state machine does not know where ticks come from. This module
//! supplies them: a `Ticker` waits one period, and `run_timer` feeds ticks
//! to the workout until its timer stops.

use crate::{HistoryStore, TickOutcome, Workout};
use std::time::Duration;

/// Source of timer periods
pub trait Ticker {
    /// Block until the next tick is due
    fn wait(&mut self);
}

/// Ticker that sleeps for a fixed interval
#[derive(Clone, Copy, Debug)]
pub struct IntervalTicker {
    interval: Duration,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker for IntervalTicker {
    fn wait(&mut self) {
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
    }
}

/// Tick the workout's running timer until it stops
///
/// `on_tick` is called with the remaining seconds after every tick, ending
/// with 0 when the timer elapses. Returns the number of ticks delivered;
/// zero if no timer was running.
pub fn run_timer<S, T, F>(workout: &mut Workout<S>, ticker: &mut T, mut on_tick: F) -> u32
where
    S: HistoryStore,
    T: Ticker,
    F: FnMut(u32),
{
    let mut ticks = 0;
    if workout.remaining().is_none() {
        return ticks;
    }

    loop {
        ticker.wait();
        match workout.tick() {
            TickOutcome::Running { remaining } => {
                ticks += 1;
                on_tick(remaining);
            }
            TickOutcome::Elapsed => {
                ticks += 1;
                on_tick(0);
                break;
            }
            TickOutcome::Ignored => break,
        }
    }

    tracing::debug!("Timer delivered {} ticks", ticks);
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::sample_record;
    use crate::MemoryStore;

    /// Ticker that records how often it was asked to wait
    #[derive(Default)]
    struct CountingTicker {
        waits: u32,
    }

    impl Ticker for CountingTicker {
        fn wait(&mut self) {
            self.waits += 1;
        }
    }

    #[test]
    fn test_run_timer_counts_down_to_zero() {
        // sample record is "normal": first exercise is 60 seconds
        let mut workout = Workout::plan(MemoryStore::new(), sample_record());
        workout.start().unwrap();
        assert!(workout.start_timer());

        let mut ticker = CountingTicker::default();
        let mut seen = Vec::new();
        let ticks = run_timer(&mut workout, &mut ticker, |r| seen.push(r));

        assert_eq!(ticks, 60);
        assert_eq!(ticker.waits, 60);
        assert_eq!(seen.first(), Some(&59));
        assert_eq!(seen.last(), Some(&0));
        assert!(workout.can_complete());
    }

    #[test]
    fn test_run_timer_without_running_timer_does_nothing() {
        let mut workout = Workout::plan(MemoryStore::new(), sample_record());
        workout.start().unwrap();

        let mut ticker = CountingTicker::default();
        let ticks = run_timer(&mut workout, &mut ticker, |_| panic!("no ticks expected"));

        assert_eq!(ticks, 0);
        assert_eq!(ticker.waits, 0);
    }

    #[test]
    fn test_zero_interval_ticker_returns_immediately() {
        let mut workout = Workout::plan(MemoryStore::new(), sample_record());
        workout.start().unwrap();
        workout.start_timer();

        let mut ticker = IntervalTicker::from_millis(0);
        assert_eq!(run_timer(&mut workout, &mut ticker, |_| {}), 60);
    }
}
