//! Timer primitives for page behaviors.
//!
//! Everything runs as tokio tasks on the page's runtime. Delays go through
//! `tokio::time`, so a paused test clock drives them deterministically.
//! There is no cancellation API: tasks live until the runtime
//! that owns the page is dropped.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Runs `f` once after `delay`.
pub fn after<F>(delay: Duration, f: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        time::sleep(delay).await;
        f();
    })
}

/// Runs `tick` every `period`, first after one full period, until it breaks.
///
/// Returns the number of ticks that ran.
pub fn every<F>(period: Duration, tick: F) -> JoinHandle<u64>
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    tokio::spawn(repeat(period, tick))
}

/// The loop behind [`every`], usable inline from another task.
pub async fn repeat<F>(period: Duration, mut tick: F) -> u64
where
    F: FnMut() -> ControlFlow<()>,
{
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks = 0;
    loop {
        interval.tick().await;
        ticks += 1;
        if tick().is_break() {
            return ticks;
        }
    }
}

/// A task that re-arms itself forever.
///
/// Each round runs to completion and yields the delay until the next round
/// starts, measured from the start of the round that produced it.
pub struct RepeatingTask;

impl RepeatingTask {
    pub fn spawn<S, R, Fut>(first_delay: Duration, state: S, round: R) -> JoinHandle<()>
    where
        S: Send + 'static,
        R: FnMut(&mut S) -> Fut + Send + 'static,
        Fut: Future<Output = Duration> + Send + 'static,
    {
        tokio::spawn(Self::run(first_delay, state, round))
    }

    pub async fn run<S, R, Fut>(first_delay: Duration, mut state: S, mut round: R)
    where
        R: FnMut(&mut S) -> Fut,
        Fut: Future<Output = Duration>,
    {
        let mut due = Instant::now() + first_delay;
        loop {
            time::sleep_until(due).await;
            let started = Instant::now();
            let next_delay = round(&mut state).await;
            due = started + next_delay;
        }
    }
}
