//! Tick sources for auto-advance.
//!
//! A [`TickSource`] is the single scheduled task behind auto-advance. Dropping
//! it cancels it: pending ticks are discarded and, for the thread-backed
//! source, the worker thread is stopped and joined before `drop` returns.

use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A running repeating timer. Cancelled on drop.
pub trait TickSource {
    /// Take the ticks that fired since the last call, without blocking.
    fn drain(&mut self) -> usize;

    /// Block until at least one tick is pending or `timeout` elapses, then
    /// take the pending ticks.
    fn wait(&mut self, timeout: Duration) -> usize {
        let _ = timeout;
        self.drain()
    }
}

/// Starts tick sources.
pub trait Scheduler {
    fn start(&self, interval: Duration) -> Box<dyn TickSource>;
}

/// Scheduler backed by one OS thread per started source.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn start(&self, interval: Duration) -> Box<dyn TickSource> {
        Box::new(ThreadTicker::spawn(interval))
    }
}

#[derive(Debug, Default)]
struct TickerState {
    pending: usize,
    cancelled: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<TickerState>,
    signal: Condvar,
}

pub struct ThreadTicker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadTicker {
    pub fn spawn(interval: Duration) -> Self {
        let shared = Arc::new(Shared::default());
        let worker = Arc::clone(&shared);
        let handle = thread::spawn(move || run_ticker(&worker, interval));
        debug!(interval_ms = interval.as_millis() as u64, "Started ticker thread");
        Self {
            shared,
            handle: Some(handle),
        }
    }
}

fn run_ticker(shared: &Shared, interval: Duration) {
    let mut deadline = Instant::now() + interval;
    let mut state = shared.state.lock();
    loop {
        if state.cancelled {
            break;
        }
        if Instant::now() >= deadline {
            state.pending += 1;
            deadline += interval;
            shared.signal.notify_all();
            continue;
        }
        shared.signal.wait_until(&mut state, deadline);
    }
}

/// Join a ticker thread, logging if it died by panic. Returns whether it
/// exited cleanly.
fn join_worker(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            warn!("Ticker thread panicked");
            false
        }
    }
}

impl TickSource for ThreadTicker {
    fn drain(&mut self) -> usize {
        std::mem::take(&mut self.shared.state.lock().pending)
    }

    fn wait(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.pending == 0 {
            if self.shared.signal.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        std::mem::take(&mut state.pending)
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.cancelled = true;
            state.pending = 0;
        }
        self.shared.signal.notify_all();
        if let Some(handle) = self.handle.take() {
            join_worker(handle);
        }
        debug!("Stopped ticker thread");
    }
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    started: usize,
    live: HashMap<u64, usize>,
}

/// Scheduler whose ticks are fired by hand.
///
/// Clones share state, so a test can keep one handle while the controller
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one tick on every live source. Returns how many sources got it.
    pub fn fire(&self) -> usize {
        let mut state = self.state.lock();
        for pending in state.live.values_mut() {
            *pending += 1;
        }
        state.live.len()
    }

    /// Sources started and not yet dropped.
    pub fn live_sources(&self) -> usize {
        self.state.lock().live.len()
    }

    /// Sources ever started.
    pub fn started(&self) -> usize {
        self.state.lock().started
    }
}

impl Scheduler for ManualScheduler {
    fn start(&self, _interval: Duration) -> Box<dyn TickSource> {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.started += 1;
        state.live.insert(id, 0);
        Box::new(ManualTicker {
            id,
            state: Arc::clone(&self.state),
        })
    }
}

struct ManualTicker {
    id: u64,
    state: Arc<Mutex<ManualState>>,
}

impl TickSource for ManualTicker {
    fn drain(&mut self) -> usize {
        self.state
            .lock()
            .live
            .get_mut(&self.id)
            .map(std::mem::take)
            .unwrap_or(0)
    }
}

impl Drop for ManualTicker {
    fn drop(&mut self) {
        self.state.lock().live.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticks_reach_only_live_sources() {
        let sched = ManualScheduler::new();
        let mut a = sched.start(Duration::from_millis(10));
        assert_eq!(sched.fire(), 1);
        assert_eq!(sched.fire(), 1);
        assert_eq!(a.drain(), 2);
        assert_eq!(a.drain(), 0);
        drop(a);
        assert_eq!(sched.fire(), 0);
        assert_eq!(sched.live_sources(), 0);
        assert_eq!(sched.started(), 1);
    }

    #[test]
    fn thread_ticker_fires_and_stops() {
        let mut ticker = ThreadTicker::spawn(Duration::from_millis(5));
        let mut seen = 0;
        let give_up = Instant::now() + Duration::from_secs(5);
        while seen < 3 && Instant::now() < give_up {
            seen += ticker.wait(Duration::from_millis(200));
        }
        assert!(seen >= 3);
        // joins the worker; must not hang
        drop(ticker);
    }

    #[test]
    fn panicked_worker_is_reported() {
        let clean = thread::spawn(|| {});
        assert!(join_worker(clean));
        let dead = thread::spawn(|| panic!("ticker died"));
        assert!(!join_worker(dead));
    }
}
