// SmartTimer - countdown with exact pause/resume and scheduled expiry
//
// Expiry is a single callback armed for exactly the remaining time, re-armed
// on every start/resume and canceled on pause/stop. There is no polling
// interval, so completion fires promptly and pause/resume never drifts.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use crate::events::{current_timestamp, TimerEventEmitter, TimerEventPayload};
use crate::speech::{contains_cjk, SpeechSynthesizer};
use crate::timer::TimerState;
use crate::util::{Clock, DelayedTask};

/// Read-only display view of the active timer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Label verbatim from the matched instruction text
    pub label: String,
    /// Originally requested duration in seconds
    pub total_seconds: f64,
    /// "running", "paused", or "done"
    pub status: &'static str,
    /// Whole seconds left, rounded up
    pub remaining_seconds: u64,
}

/// Countdown timer with wall-clock deadlines.
///
/// At most one timer is active; starting a new one replaces it. Completion
/// is announced through the speech synthesizer exactly once per timer.
pub struct SmartTimer {
    slot: Arc<Mutex<Option<TimerState>>>,
    clock: Arc<dyn Clock>,
    speech: Arc<dyn SpeechSynthesizer>,
    emitter: Option<Arc<dyn TimerEventEmitter>>,
    scheduler: DelayedTask,
}

impl SmartTimer {
    pub fn new(clock: Arc<dyn Clock>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            clock,
            speech,
            emitter: None,
            scheduler: DelayedTask::spawn("timer-expiry"),
        }
    }

    /// Wire an event emitter for timer lifecycle notifications.
    pub fn with_emitter(mut self, emitter: Arc<dyn TimerEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Start a countdown, replacing any existing timer.
    ///
    /// Non-finite or non-positive durations are ignored: no timer is
    /// created and no error surfaces.
    pub fn start(&self, seconds: f64, label: &str) {
        let now = self.clock.now_ms();
        let Some(timer) = TimerState::start(seconds, label, now) else {
            crate::debug!("[timer] Ignoring invalid duration {}s", seconds);
            return;
        };

        let remaining = timer.remaining_ms(now);
        let total_seconds = timer.total_seconds;
        match self.slot.lock() {
            Ok(mut guard) => *guard = Some(timer),
            Err(_) => {
                crate::error!("[timer] State lock poisoned, timer not started");
                return;
            }
        }

        crate::info!("[timer] Started \"{}\" for {}s", label, seconds);
        self.arm(remaining);
        if let Some(emitter) = &self.emitter {
            emitter.emit_timer_started(TimerEventPayload {
                label: label.to_string(),
                total_seconds,
                timestamp: current_timestamp(),
            });
        }
    }

    /// Pause the running timer. Returns whether anything paused; paused,
    /// done, or absent timers are left untouched.
    pub fn pause(&self) -> bool {
        let now = self.clock.now_ms();
        let paused = self
            .slot
            .lock()
            .map(|mut guard| guard.as_mut().is_some_and(|t| t.pause(now)))
            .unwrap_or(false);
        if paused {
            // The armed expiry belongs to the old deadline
            self.scheduler.cancel();
            crate::debug!("[timer] Paused");
        }
        paused
    }

    /// Resume the paused timer. Returns whether anything resumed.
    ///
    /// A timer paused with nothing left completes immediately instead of
    /// being scheduled.
    pub fn resume(&self) -> bool {
        let now = self.clock.now_ms();
        let mut finished: Option<String> = None;
        let resumed = {
            let Ok(mut guard) = self.slot.lock() else {
                return false;
            };
            let Some(timer) = guard.as_mut() else {
                return false;
            };
            if !timer.is_paused() {
                false
            } else if timer.remaining_ms(now) <= 0 {
                if timer.finish() {
                    finished = Some(timer.label.clone());
                }
                true
            } else {
                let resumed = timer.resume(now);
                if resumed {
                    let remaining = timer.remaining_ms(now);
                    drop(guard);
                    self.arm(remaining);
                }
                return resumed;
            }
        };

        if let Some(label) = finished {
            self.announce_finished(&label);
        } else if resumed {
            crate::debug!("[timer] Resumed");
        }
        resumed
    }

    /// Flip between running and paused. No-op when done or absent.
    pub fn toggle(&self) -> bool {
        if self.is_running() {
            self.pause()
        } else {
            self.resume()
        }
    }

    /// Discard the timer unconditionally. No error when none exists.
    pub fn stop(&self) {
        let removed = self
            .slot
            .lock()
            .map(|mut guard| guard.take())
            .unwrap_or(None);
        self.scheduler.cancel();

        if let Some(timer) = removed {
            crate::info!("[timer] Stopped \"{}\"", timer.label);
            if let Some(emitter) = &self.emitter {
                emitter.emit_timer_stopped(TimerEventPayload {
                    label: timer.label,
                    total_seconds: timer.total_seconds,
                    timestamp: current_timestamp(),
                });
            }
        }
    }

    /// Whether a timer exists in any phase.
    pub fn is_active(&self) -> bool {
        self.slot
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    pub fn is_running(&self) -> bool {
        self.slot
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|t| t.is_running()))
            .unwrap_or(false)
    }

    pub fn is_paused(&self) -> bool {
        self.slot
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|t| t.is_paused()))
            .unwrap_or(false)
    }

    /// Whole seconds left for display; 0 when done or absent.
    pub fn remaining_seconds(&self) -> u64 {
        let now = self.clock.now_ms();
        self.slot
            .lock()
            .map(|guard| {
                guard
                    .as_ref()
                    .map(|t| t.remaining_seconds(now))
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Display view of the timer, if one exists. Never mutates state.
    pub fn snapshot(&self) -> Option<TimerSnapshot> {
        let now = self.clock.now_ms();
        let guard = self.slot.lock().ok()?;
        guard.as_ref().map(|t| TimerSnapshot {
            label: t.label.clone(),
            total_seconds: t.total_seconds,
            status: if t.is_running() {
                "running"
            } else if t.is_paused() {
                "paused"
            } else {
                "done"
            },
            remaining_seconds: t.remaining_seconds(now),
        })
    }

    /// Arm the expiry callback for `remaining_ms` from now, superseding any
    /// previously armed callback.
    fn arm(&self, remaining_ms: i64) {
        let slot = self.slot.clone();
        let clock = self.clock.clone();
        let speech = self.speech.clone();
        let emitter = self.emitter.clone();
        self.scheduler.schedule(
            Duration::from_millis(remaining_ms.max(0) as u64),
            move || fire_expiry(&slot, clock.as_ref(), speech.as_ref(), emitter.as_deref()),
        );
    }

    fn announce_finished(&self, label: &str) {
        announce(
            self.speech.as_ref(),
            self.emitter.as_deref(),
            label,
            self.slot
                .lock()
                .ok()
                .and_then(|g| g.as_ref().map(|t| t.total_seconds))
                .unwrap_or(0.0),
        );
    }
}

/// Expiry callback: runs on the scheduler thread when the deadline passes.
///
/// Guarded so a superseded or re-armed timer is never finished early: only
/// a running timer actually past its deadline transitions, and the
/// announcement happens exactly once per transition into done.
fn fire_expiry(
    slot: &Mutex<Option<TimerState>>,
    clock: &dyn Clock,
    speech: &dyn SpeechSynthesizer,
    emitter: Option<&dyn TimerEventEmitter>,
) {
    let finished = {
        let Ok(mut guard) = slot.lock() else {
            return;
        };
        match guard.as_mut() {
            Some(timer) if timer.is_running() && timer.remaining_ms(clock.now_ms()) <= 0 => {
                if timer.finish() {
                    Some((timer.label.clone(), timer.total_seconds))
                } else {
                    None
                }
            }
            _ => None,
        }
    };

    if let Some((label, total_seconds)) = finished {
        announce(speech, emitter, &label, total_seconds);
    }
}

/// Speak the completion phrase and emit the finished event.
///
/// Labels containing CJK text get the Chinese phrasing so the TTS voice
/// matches the label it reads back.
fn announce(
    speech: &dyn SpeechSynthesizer,
    emitter: Option<&dyn TimerEventEmitter>,
    label: &str,
    total_seconds: f64,
) {
    crate::info!("[timer] Finished \"{}\"", label);
    let phrase = if contains_cjk(label) {
        format!("{} 時間到", label)
    } else {
        format!("{} timer finished", label)
    };
    speech.speak(&phrase);

    if let Some(emitter) = emitter {
        emitter.emit_timer_finished(TimerEventPayload {
            label: label.to_string(),
            total_seconds,
            timestamp: current_timestamp(),
        });
    }
}

#[cfg(test)]
#[path = "smart_test.rs"]
mod tests;
