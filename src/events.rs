// Session events for presentation-layer notification
// Defines event payloads and emission traits for testability

use serde::Serialize;

use crate::gesture::GestureDirection;
use crate::voice::VoiceCommand;

/// Event names as constants for consistency
pub mod event_names {
    pub const STEP_CHANGED: &str = "step_changed";
    pub const GESTURE_DETECTED: &str = "gesture_detected";
    pub const COMMAND_FEEDBACK: &str = "command_feedback";
    pub const SESSION_CLOSED: &str = "session_closed";
}

/// Timer-related event names
pub mod timer_events {
    pub const TIMER_STARTED: &str = "timer_started";
    pub const TIMER_STOPPED: &str = "timer_stopped";
    pub const TIMER_FINISHED: &str = "timer_finished";
}

/// Payload for step_changed event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepChangedPayload {
    /// Index of the step now showing
    pub step_index: usize,
    /// Total number of instruction steps
    pub total_steps: usize,
    /// ISO 8601 timestamp of the change
    pub timestamp: String,
}

/// Payload for gesture_detected event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GestureDetectedPayload {
    /// Direction of the detected swipe
    pub direction: GestureDirection,
    /// ISO 8601 timestamp of detection
    pub timestamp: String,
}

/// Payload for command_feedback event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandFeedbackPayload {
    /// The command the feedback describes
    pub command: VoiceCommand,
    /// Short human-readable label (e.g. "Next Step")
    pub label: String,
}

/// Payload for timer_started / timer_stopped / timer_finished events
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerEventPayload {
    /// The timer's label, verbatim from the matched instruction text
    pub label: String,
    /// Originally requested duration in seconds
    pub total_seconds: f64,
    /// ISO 8601 timestamp of the event
    pub timestamp: String,
}

/// Trait for emitting session events
/// Allows mocking in tests while wiring a real bridge in production
pub trait SessionEventEmitter: Send + Sync {
    /// Emit step_changed event
    fn emit_step_changed(&self, payload: StepChangedPayload);

    /// Emit gesture_detected event
    fn emit_gesture_detected(&self, payload: GestureDetectedPayload);

    /// Emit command_feedback event
    fn emit_command_feedback(&self, payload: CommandFeedbackPayload);

    /// Emit session_closed event
    fn emit_session_closed(&self);
}

/// Trait for emitting timer events
/// Kept separate from SessionEventEmitter so the timer does not depend on
/// session-level payloads
pub trait TimerEventEmitter: Send + Sync {
    /// Emit timer_started event
    fn emit_timer_started(&self, payload: TimerEventPayload);

    /// Emit timer_stopped event
    fn emit_timer_stopped(&self, payload: TimerEventPayload);

    /// Emit timer_finished event
    fn emit_timer_finished(&self, payload: TimerEventPayload);
}

/// Get the current timestamp in ISO 8601 format
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
