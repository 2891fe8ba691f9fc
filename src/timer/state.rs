// Timer state machine
//
// The phase carries its own time field: a running timer stores an absolute
// epoch-ms deadline, a paused timer stores the remaining milliseconds. That
// split is what makes pause/resume exact — resuming adds the stored
// remainder to the current time, so no drift accumulates no matter how long
// the pause lasts.

use serde::Serialize;

/// Phase of a countdown timer.
///
/// Valid transitions:
/// - Running -> Paused (user pause)
/// - Paused -> Running (user resume)
/// - Running -> Done (expiry)
/// - any -> removed (session-level discard, not a phase)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimerPhase {
    /// Counting down toward an absolute epoch-millisecond deadline
    Running { ends_at_ms: i64 },
    /// Frozen with this many milliseconds left
    Paused { remaining_ms: i64 },
    /// Expired; terminal
    Done,
}

/// A countdown timer extracted from an instruction step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerState {
    /// Human-readable description, verbatim from the matched text
    /// (e.g. "45 mins", "三十分鐘")
    pub label: String,
    /// Originally requested duration in seconds; display/reset reference only
    pub total_seconds: f64,
    /// Current phase, carrying the deadline or remainder
    pub phase: TimerPhase,
}

impl TimerState {
    /// Create a running timer ending `seconds` from `now_ms`.
    ///
    /// Returns `None` unless `seconds` is a finite positive number; invalid
    /// durations never create a timer.
    pub fn start(seconds: f64, label: impl Into<String>, now_ms: i64) -> Option<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return None;
        }
        Some(Self {
            label: label.into(),
            total_seconds: seconds,
            phase: TimerPhase::Running {
                ends_at_ms: now_ms + (seconds * 1000.0) as i64,
            },
        })
    }

    /// Freeze a running timer, capturing the remaining milliseconds.
    /// No-op in any other phase. Returns whether the timer paused.
    pub fn pause(&mut self, now_ms: i64) -> bool {
        match self.phase {
            TimerPhase::Running { ends_at_ms } => {
                self.phase = TimerPhase::Paused {
                    remaining_ms: (ends_at_ms - now_ms).max(0),
                };
                true
            }
            _ => false,
        }
    }

    /// Resume a paused timer, converting the stored remainder back into an
    /// absolute deadline. No-op in any other phase. Returns whether the
    /// timer resumed.
    pub fn resume(&mut self, now_ms: i64) -> bool {
        match self.phase {
            TimerPhase::Paused { remaining_ms } => {
                self.phase = TimerPhase::Running {
                    ends_at_ms: now_ms + remaining_ms,
                };
                true
            }
            _ => false,
        }
    }

    /// Flip between running and paused. No-op when done.
    pub fn toggle(&mut self, now_ms: i64) -> bool {
        match self.phase {
            TimerPhase::Running { .. } => self.pause(now_ms),
            TimerPhase::Paused { .. } => self.resume(now_ms),
            TimerPhase::Done => false,
        }
    }

    /// Mark the timer expired. Idempotent; returns whether this call
    /// performed the transition (callers announce completion exactly once).
    pub fn finish(&mut self) -> bool {
        if matches!(self.phase, TimerPhase::Done) {
            return false;
        }
        self.phase = TimerPhase::Done;
        true
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, TimerPhase::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, TimerPhase::Paused { .. })
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, TimerPhase::Done)
    }

    /// Milliseconds left on the clock. Read-only; never mutates the phase,
    /// even when a running timer is already past its deadline.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        match self.phase {
            TimerPhase::Running { ends_at_ms } => (ends_at_ms - now_ms).max(0),
            TimerPhase::Paused { remaining_ms } => remaining_ms,
            TimerPhase::Done => 0,
        }
    }

    /// Whole seconds left for display, rounded up so the countdown shows
    /// "1" until the moment it hits zero.
    pub fn remaining_seconds(&self, now_ms: i64) -> u64 {
        let ms = self.remaining_ms(now_ms);
        ((ms + 999) / 1000) as u64
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
