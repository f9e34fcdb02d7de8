//! Timer service abstraction and a deterministic virtual clock
//!
//! The controller owns two timers at most: the repeating autoplay tick and
//! the one-shot interaction expiry. Fired timers come back to the controller
//! through `CarouselController::on_timer`.

use std::collections::HashMap;
use std::time::Duration;

/// Identity of a controller-owned timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Repeating autoplay tick.
    Autoplay,
    /// One-shot end of the post-interaction quiet period.
    InteractionExpiry,
}

/// Scheduling backend used by the controller.
///
/// Scheduling an id that is already scheduled replaces the previous
/// instance. `cancel` is a no-op when nothing is scheduled.
pub trait TimerService {
    fn schedule_repeating(&mut self, id: TimerId, period: Duration);
    fn schedule_once(&mut self, id: TimerId, delay: Duration);
    fn cancel(&mut self, id: TimerId);
}

impl<T: TimerService + ?Sized> TimerService for Box<T> {
    fn schedule_repeating(&mut self, id: TimerId, period: Duration) {
        (**self).schedule_repeating(id, period);
    }

    fn schedule_once(&mut self, id: TimerId, delay: Duration) {
        (**self).schedule_once(id, delay);
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id);
    }
}

#[derive(Debug, Clone, Copy)]
struct VirtualTimer {
    deadline: Duration,
    period: Option<Duration>,
    /// Scheduling order, breaks deadline ties.
    seq: u64,
}

/// Virtual time timer service for deterministic hosts and tests.
///
/// Time only moves through [`VirtualTimers::pop_due`] and
/// [`VirtualTimers::advance_to`].
#[derive(Debug, Clone, Default)]
pub struct VirtualTimers {
    now: Duration,
    timers: HashMap<TimerId, VirtualTimer>,
    next_seq: u64,
}

impl VirtualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Get the number of pending timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn deadline(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(&id).map(|timer| timer.deadline)
    }

    /// Earliest pending timer.
    pub fn next_due(&self) -> Option<(Duration, TimerId)> {
        self.timers
            .iter()
            .min_by_key(|(_, timer)| (timer.deadline, timer.seq))
            .map(|(id, timer)| (timer.deadline, *id))
    }

    /// Fire the earliest timer due at or before `until`.
    ///
    /// Moves virtual time to the fired deadline. Repeating timers are
    /// re-armed one period later, one-shot timers are removed.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (deadline, id) = self.next_due()?;
        if deadline > until {
            return None;
        }
        self.now = self.now.max(deadline);

        let seq = self.bump_seq();
        let period = self.timers.get(&id).and_then(|timer| timer.period);
        match period {
            Some(period) => {
                if let Some(timer) = self.timers.get_mut(&id) {
                    timer.deadline += period;
                    timer.seq = seq;
                }
            }
            None => {
                self.timers.remove(&id);
            }
        }
        Some(id)
    }

    /// Move virtual time forward without firing anything. Callers drain
    /// [`VirtualTimers::pop_due`] first.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn insert(&mut self, id: TimerId, delay: Duration, period: Option<Duration>) {
        let seq = self.bump_seq();
        self.timers.insert(
            id,
            VirtualTimer {
                deadline: self.now + delay,
                period,
                seq,
            },
        );
    }
}

impl TimerService for VirtualTimers {
    fn schedule_repeating(&mut self, id: TimerId, period: Duration) {
        self.insert(id, period, Some(period));
    }

    fn schedule_once(&mut self, id: TimerId, delay: Duration) {
        self.insert(id, delay, None);
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }
}
