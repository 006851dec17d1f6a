// Count-up animation for the stats section

use crate::settings::Settings;
use std::time::Duration;

/// Animates from 0 to `target` in fixed frames. The per-frame increment is
/// `target / (duration / frame)`; the last frame snaps to the target.
#[derive(Debug, Clone)]
pub struct Counter {
    target: u64,
    increment: f64,
    current: f64,
    frame: Duration,
    since_frame: Duration,
    done: bool,
}

impl Counter {
    pub fn new(target: u64, settings: &Settings) -> Self {
        let frames = (settings.counter_duration_ms as f64 / settings.counter_frame_ms.max(1) as f64).max(1.0);
        Self {
            target,
            increment: target as f64 / frames,
            current: 0.0,
            frame: Duration::from_millis(settings.counter_frame_ms.max(1)),
            since_frame: Duration::ZERO,
            done: target == 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn value(&self) -> u64 {
        if self.done {
            self.target
        } else {
            self.current.floor() as u64
        }
    }

    /// Text currently displayed
    pub fn display(&self) -> String {
        format_count(self.value())
    }

    /// Run every whole frame contained in `elapsed`
    pub fn advance(&mut self, elapsed: Duration) {
        self.since_frame += elapsed;
        while !self.done && self.since_frame >= self.frame {
            self.since_frame -= self.frame;
            self.current += self.increment;
            if self.current >= self.target as f64 {
                self.current = self.target as f64;
                self.done = true;
            }
        }
    }

    /// Time until the next frame, `None` once finished
    pub fn next_due_in(&self) -> Option<Duration> {
        (!self.done).then(|| self.frame.saturating_sub(self.since_frame))
    }
}

/// `1500` becomes `2k+`; smaller values print as-is
pub fn format_count(n: u64) -> String {
    if n >= 1000 {
        format!("{}k+", (n as f64 / 1000.0).round() as u64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1k+");
        assert_eq!(format_count(10_000), "10k+");
        assert_eq!(format_count(1500), "2k+");
    }

    #[test]
    fn test_reaches_target_within_duration() {
        let mut counter = Counter::new(500, &Settings::default());
        assert_eq!(counter.display(), "0");
        counter.advance(Duration::from_millis(1000));
        assert!(!counter.is_done());
        assert!(counter.value() > 0 && counter.value() < 500);

        counter.advance(Duration::from_millis(1100));
        assert!(counter.is_done());
        assert_eq!(counter.value(), 500);
        assert_eq!(counter.next_due_in(), None);
    }

    #[test]
    fn test_zero_target_is_done() {
        let counter = Counter::new(0, &Settings::default());
        assert!(counter.is_done());
        assert_eq!(counter.display(), "0");
    }
}
