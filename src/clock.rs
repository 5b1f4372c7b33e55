//! Fixed-period tick scheduling and cancellable deferred actions.

use std::time::{Duration, Instant};

/// Decides when the next simulation tick is due.
///
/// Late ticks are not caught up: after a slow frame or a pause the next
/// tick is simply one period after the moment it fired.
#[derive(Clone, Debug)]
pub struct Clock {
    period: Duration,
    next: Option<Instant>,
    paused: bool,
}

impl Clock {
    pub fn new(period: Duration) -> Self {
        Clock {
            period,
            next: None,
            paused: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts ticking; the first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now);
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.next = None;
        self.paused = false;
    }

    /// Started and not stopped since; a paused clock still counts.
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if self.next.is_some() {
            self.paused = true;
        }
    }

    /// Carries on one period from `now`; time spent paused is dropped.
    pub fn resume(&mut self, now: Instant) {
        if self.paused {
            self.paused = false;
            self.next = Some(now + self.period);
        }
    }

    /// True when a tick should run at `now`. At most one tick per call.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if !self.paused && now >= due => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// How long the caller may sleep before the next tick is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        match self.next {
            Some(due) if !self.paused => due.saturating_duration_since(now),
            _ => self.period,
        }
    }
}

// ── Deferred actions ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Timer<T> {
    due: u64,
    generation: u64,
    action: T,
}

/// One-shot actions keyed to a tick count. `cancel_all` invalidates every
/// pending action without having to find them.
#[derive(Clone, Debug)]
pub struct Timers<T> {
    pending: Vec<Timer<T>>,
    generation: u64,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Timers {
            pending: Vec::new(),
            generation: 0,
        }
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` to fire once the tick counter reaches `due`.
    pub fn schedule(&mut self, due: u64, action: T) {
        self.pending.push(Timer {
            due,
            generation: self.generation,
            action,
        });
    }

    /// Stale actions stay queued until their tick comes round, then are
    /// discarded instead of fired.
    pub fn cancel_all(&mut self) {
        self.generation += 1;
    }

    /// Actions that will still fire.
    pub fn len(&self) -> usize {
        self.pending
            .iter()
            .filter(|t| t.generation == self.generation)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns every action due at `now`, in scheduling order.
    pub fn take_due(&mut self, now: u64) -> Vec<T> {
        let generation = self.generation;
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|t| t.due <= now);
        self.pending = pending;
        due.into_iter()
            .filter(|t| t.generation == generation)
            .map(|t| t.action)
            .collect()
    }
}
