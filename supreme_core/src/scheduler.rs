// Cancelable delayed tasks on a host-driven virtual clock

use std::time::Duration;

/// Identity of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Scheduled<A> {
    id: TaskId,
    key: Option<String>,
    due: Duration,
    action: A,
}

/// Queue of delayed actions.
///
/// Time only moves when the host calls [`Scheduler::advance`], so the same
/// queue works under `setTimeout`, a tokio sleep loop or a unit test. Tasks
/// scheduled under a key replace any pending task with that key, which keeps
/// overlapping triggers from firing twice.
#[derive(Debug)]
pub struct Scheduler<A> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<A>>,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `action` once `delay` has elapsed
    pub fn schedule(&mut self, delay: Duration, action: A) -> TaskId {
        self.push(None, delay, action)
    }

    /// Like `schedule`, but first cancels any pending task with the same key
    pub fn schedule_keyed(&mut self, key: impl Into<String>, delay: Duration, action: A) -> TaskId {
        let key = key.into();
        self.cancel_key(&key);
        self.push(Some(key), delay, action)
    }

    fn push(&mut self, key: Option<String>, delay: Duration, action: A) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.push(Scheduled {
            id,
            key,
            due: self.now + delay,
            action,
        });
        id
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending task scheduled under `key`
    pub fn cancel_key(&mut self, key: &str) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.key.as_deref() != Some(key));
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn is_key_pending(&self, key: &str) -> bool {
        self.pending.iter().any(|t| t.key.as_deref() == Some(key))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Time until the earliest pending task is due
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|t| t.due.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and return the actions that became due, in
    /// due order (ties broken by scheduling order).
    pub fn advance(&mut self, elapsed: Duration) -> Vec<A> {
        self.now += elapsed;
        let now = self.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|t| (t.due, t.id));
        due.into_iter().map(|t| t.action).collect()
    }

    /// Advance to the next due point within `remaining`, returning what fired
    /// there. Returns `None` once the budget is spent with nothing left due.
    ///
    /// Lets a caller schedule follow-up tasks at the instant their trigger
    /// fired rather than at the end of a long jump.
    pub fn step(&mut self, remaining: &mut Duration) -> Option<Vec<A>> {
        match self.next_due_in() {
            Some(due_in) if due_in <= *remaining => {
                *remaining -= due_in;
                Some(self.advance(due_in))
            }
            _ => {
                self.now += *remaining;
                *remaining = Duration::ZERO;
                None
            }
        }
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole milliseconds elapsed between two wall-clock readings (fractional ms,
/// as from `Date.now()`), and the reading to sync from next time. The
/// fractional remainder stays behind so repeated syncs never lose time.
pub fn elapsed_whole_millis(last_tick: f64, now: f64) -> (Duration, f64) {
    let whole = (now - last_tick).max(0.0).floor();
    (Duration::from_millis(whole as u64), last_tick + whole)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_elapsed_whole_millis_keeps_remainder() {
        let (step, next) = elapsed_whole_millis(1000.0, 1010.7);
        assert_eq!(step, ms(10));
        assert_eq!(next, 1010.0);

        // the carried 0.7 ms plus another 0.6 ms adds up to a whole one
        let (step, next) = elapsed_whole_millis(next, 1011.3);
        assert_eq!(step, ms(1));
        assert_eq!(next, 1011.0);

        let mut last = 0.0;
        let mut total = Duration::ZERO;
        for i in 1..=100 {
            let (step, next) = elapsed_whole_millis(last, f64::from(i) * 1.5);
            total += step;
            last = next;
        }
        assert_eq!(total, ms(150));
    }

    #[test]
    fn test_elapsed_whole_millis_ignores_backwards_clock() {
        let (step, next) = elapsed_whole_millis(500.0, 400.0);
        assert_eq!(step, Duration::ZERO);
        assert_eq!(next, 500.0);
    }

    #[test]
    fn test_fires_only_when_due() {
        let mut s = Scheduler::new();
        s.schedule(ms(300), "open");
        assert!(s.advance(ms(299)).is_empty());
        assert_eq!(s.advance(ms(1)), vec!["open"]);
        assert!(s.advance(ms(1000)).is_empty());
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(3000), "hide");
        s.schedule(ms(100), "show");
        s.schedule(ms(100), "show-again");
        assert_eq!(s.advance(ms(5000)), vec!["show", "show-again", "hide"]);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let id = s.schedule(ms(10), 1);
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(s.advance(ms(10)).is_empty());
    }

    #[test]
    fn test_keyed_replaces_pending() {
        let mut s = Scheduler::new();
        s.schedule_keyed("toast", ms(100), "first");
        s.advance(ms(50));
        s.schedule_keyed("toast", ms(100), "second");
        assert_eq!(s.pending_count(), 1);
        assert!(s.advance(ms(60)).is_empty());
        assert_eq!(s.advance(ms(40)), vec!["second"]);
        assert!(!s.is_key_pending("toast"));
    }

    #[test]
    fn test_step_schedules_follow_ups_at_fire_time() {
        let mut s = Scheduler::new();
        s.schedule(ms(100), "show");
        let mut remaining = ms(1000);
        let mut fired = Vec::new();
        while let Some(actions) = s.step(&mut remaining) {
            for action in actions {
                if action == "show" {
                    s.schedule(ms(200), "hide");
                }
                fired.push((s.now(), action));
            }
        }
        assert_eq!(fired, vec![(ms(100), "show"), (ms(300), "hide")]);
        assert_eq!(s.now(), ms(1000));
    }

    #[test]
    fn test_next_due_in_is_relative() {
        let mut s = Scheduler::new();
        assert_eq!(s.next_due_in(), None);
        s.schedule(ms(300), ());
        s.advance(ms(100));
        assert_eq!(s.next_due_in(), Some(ms(200)));
    }
}
