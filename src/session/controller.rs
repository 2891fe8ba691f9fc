// Cooking session controller - the single writer of session state
//
// Three input channels feed this controller: voice commands, gesture events,
// and explicit UI calls. All of them land on discrete callbacks serialized
// through one mutex; ordering between channels is last-write-wins and
// navigation requests are never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

use crate::constants::{AUTO_READ_DELAY_MS, FEEDBACK_CLEAR_MS};
use crate::events::{
    current_timestamp, CommandFeedbackPayload, GestureDetectedPayload, SessionEventEmitter,
    StepChangedPayload, TimerEventEmitter,
};
use crate::gesture::{CameraSource, GestureDirection, GestureWorkerHandle, MotionDetector};
use crate::parsing::find_duration_in_text;
use crate::session::types::{CommandFeedback, Recipe, SessionSnapshot};
use crate::speech::SpeechSynthesizer;
use crate::timer::SmartTimer;
use crate::util::{Clock, DelayedTask, SystemClock};
use crate::voice::VoiceCommand;

/// Mutable session state behind the controller's mutex
struct SessionInner {
    current_step: usize,
    show_ingredients: bool,
    show_tips: bool,
    listening: bool,
    active_feedback: Option<CommandFeedback>,
}

/// Orchestrator for one hands-free cooking session.
///
/// Owns step navigation, overlay flags, and transient feedback; delegates
/// timer lifecycle to [`SmartTimer`] and swipe detection to the gesture
/// worker. Reads are synchronous snapshots; every failure path degrades to
/// a no-op (optionally spoken), because the user is mid-task and must never
/// be blocked by a parsing or sensor problem.
pub struct CookingSessionController {
    session_id: Uuid,
    recipe: Arc<Recipe>,
    inner: Arc<Mutex<SessionInner>>,
    timer: SmartTimer,
    speech: Arc<dyn SpeechSynthesizer>,
    clock: Arc<dyn Clock>,
    emitter: Option<Arc<dyn SessionEventEmitter>>,
    timer_emitter: Option<Arc<dyn TimerEventEmitter>>,
    camera: Mutex<Option<Box<dyn CameraSource>>>,
    gesture_worker: Mutex<Option<GestureWorkerHandle>>,
    auto_read: DelayedTask,
    feedback_clear: DelayedTask,
    on_close: Option<Box<dyn Fn() + Send + Sync>>,
    closed: AtomicBool,
}

impl CookingSessionController {
    /// Create a controller over a caller-owned recipe.
    ///
    /// Starts at step 0 with no timer, no overlays, gestures off, and the
    /// system wall clock.
    pub fn new(recipe: Arc<Recipe>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            session_id: Uuid::new_v4(),
            recipe,
            inner: Arc::new(Mutex::new(SessionInner {
                current_step: 0,
                show_ingredients: false,
                show_tips: false,
                listening: false,
                active_feedback: None,
            })),
            timer: SmartTimer::new(clock.clone(), speech.clone()),
            speech,
            clock,
            emitter: None,
            timer_emitter: None,
            camera: Mutex::new(None),
            gesture_worker: Mutex::new(None),
            auto_read: DelayedTask::spawn("auto-read"),
            feedback_clear: DelayedTask::spawn("feedback-clear"),
            on_close: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Substitute the wall clock (tests use a manual clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.rebuild_timer();
        self
    }

    /// Wire a session event emitter for the presentation layer.
    pub fn with_emitter(mut self, emitter: Arc<dyn SessionEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Wire a timer event emitter.
    pub fn with_timer_emitter(mut self, emitter: Arc<dyn TimerEventEmitter>) -> Self {
        self.timer_emitter = Some(emitter);
        self.rebuild_timer();
        self
    }

    /// Provide the camera used when gestures are enabled.
    pub fn with_camera(mut self, camera: Box<dyn CameraSource>) -> Self {
        self.camera = Mutex::new(Some(camera));
        self
    }

    /// Hook invoked once when the session closes.
    pub fn with_on_close<F>(mut self, on_close: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_close = Some(Box::new(on_close));
        self
    }

    /// Builder helper: the timer captures the clock and emitter at
    /// construction, so changing either replaces it. Only valid before the
    /// session is driven (no timer exists yet).
    fn rebuild_timer(&mut self) {
        let mut timer = SmartTimer::new(self.clock.clone(), self.speech.clone());
        if let Some(emitter) = &self.timer_emitter {
            timer = timer.with_emitter(emitter.clone());
        }
        self.timer = timer;
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    // --- NAVIGATION ---

    /// Advance one step. Returns whether movement occurred; false at the
    /// last step. Closes both overlays and, while listening, debounces a
    /// read-aloud of the step landed on.
    pub fn next_step(&self) -> bool {
        self.navigate(|step, len| (step + 1 < len).then_some(step + 1))
    }

    /// Go back one step. Returns whether movement occurred; false at the
    /// first step.
    pub fn prev_step(&self) -> bool {
        self.navigate(|step, _len| step.checked_sub(1))
    }

    fn navigate(&self, target: impl Fn(usize, usize) -> Option<usize>) -> bool {
        if self.is_closed() || self.recipe.instructions.is_empty() {
            return false;
        }

        let (moved_to, listening) = {
            let Ok(mut inner) = self.inner.lock() else {
                return false;
            };
            inner.show_ingredients = false;
            inner.show_tips = false;
            match target(inner.current_step, self.recipe.instructions.len()) {
                Some(step) => {
                    inner.current_step = step;
                    (Some(step), inner.listening)
                }
                None => (None, inner.listening),
            }
        };

        let Some(step) = moved_to else {
            return false;
        };

        crate::debug!("[session] Now on step {}", step + 1);
        if let Some(emitter) = &self.emitter {
            emitter.emit_step_changed(StepChangedPayload {
                step_index: step,
                total_steps: self.recipe.instructions.len(),
                timestamp: current_timestamp(),
            });
        }
        if listening {
            self.schedule_auto_read(step);
        }
        true
    }

    /// Debounced read-aloud of a step: only the latest scheduled read
    /// survives rapid navigation.
    fn schedule_auto_read(&self, step: usize) {
        let Some(text) = self.recipe.instructions.get(step).cloned() else {
            return;
        };
        let speech = self.speech.clone();
        self.auto_read
            .schedule(Duration::from_millis(AUTO_READ_DELAY_MS), move || {
                speech.speak(&text)
            });
    }

    // --- OVERLAYS ---

    pub fn set_show_ingredients(&self, show: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.show_ingredients = show;
        }
    }

    pub fn set_show_tips(&self, show: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.show_tips = show;
        }
    }

    fn close_overlays(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.show_ingredients = false;
            inner.show_tips = false;
        }
    }

    // --- LISTENING / AUTO-READ ---

    /// Mirror the speech collaborator's listening state. Entering listening
    /// schedules a read of the current step; leaving cancels any pending
    /// read.
    pub fn set_listening(&self, listening: bool) {
        if self.is_closed() {
            return;
        }
        let step = {
            let Ok(mut inner) = self.inner.lock() else {
                return;
            };
            inner.listening = listening;
            inner.current_step
        };
        if listening {
            self.schedule_auto_read(step);
        } else {
            self.auto_read.cancel();
        }
    }

    // --- TIMER ACTIONS (explicit UI surface) ---

    /// Start a timer directly, e.g. from a tapped suggestion.
    pub fn start_timer(&self, seconds: f64, label: &str) {
        if self.is_closed() {
            return;
        }
        self.timer.start(seconds, label);
    }

    /// Pause/resume the timer from the UI.
    pub fn toggle_timer(&self) {
        if self.is_closed() {
            return;
        }
        self.timer.toggle();
    }

    /// Discard the timer from the UI.
    pub fn stop_timer(&self) {
        if self.is_closed() {
            return;
        }
        self.timer.stop();
    }

    /// Speak arbitrary text through the session's synthesizer.
    pub fn speak(&self, text: &str) {
        self.speech.speak(text);
    }

    // --- VOICE COMMANDS ---

    /// Classify a raw final transcript and dispatch it.
    pub fn handle_transcript(&self, text: &str) {
        let command = VoiceCommand::from_transcript(text);
        self.handle_voice_command(command, text);
    }

    /// Dispatch one recognized command.
    ///
    /// Every arm closes open overlays (ReadIngredients opens the
    /// ingredient overlay instead) and answers with either a transient
    /// feedback overlay or a spoken explanation of why nothing happened.
    pub fn handle_voice_command(&self, command: VoiceCommand, _transcript: &str) {
        if self.is_closed() || self.recipe.instructions.is_empty() {
            return;
        }
        crate::debug!("[session] Voice command {:?}", command);

        match command {
            VoiceCommand::NextStep => {
                if self.next_step() {
                    self.show_feedback(command, "Next Step");
                } else {
                    self.speech.speak("That was the last step.");
                }
            }
            VoiceCommand::PrevStep => {
                if self.prev_step() {
                    self.show_feedback(command, "Previous Step");
                } else {
                    self.speech.speak("You are at the first step.");
                }
            }
            VoiceCommand::ReadCurrent => {
                self.close_overlays();
                self.show_feedback(command, "Reading...");
                self.speech.speak(&self.current_instruction());
            }
            VoiceCommand::ReadIngredients => {
                self.show_feedback(command, "Ingredients");
                if let Ok(mut inner) = self.inner.lock() {
                    inner.show_ingredients = true;
                }
                let list = self
                    .recipe
                    .ingredients
                    .iter()
                    .map(|i| i.spoken())
                    .collect::<Vec<_>>()
                    .join(". ");
                self.speech.speak(&format!("You need: {}", list));
            }
            VoiceCommand::StartTimer => {
                self.close_overlays();
                match find_duration_in_text(&self.current_instruction()) {
                    Some(found) => {
                        self.timer.start(found.seconds, &found.label);
                        self.show_feedback(command, "Timer Started");
                        self.speech
                            .speak(&format!("Starting timer for {}", found.label));
                    }
                    None => {
                        self.speech.speak("I didn't find a timer in this step.");
                    }
                }
            }
            VoiceCommand::StopTimer => {
                self.close_overlays();
                if self.timer.is_active() {
                    self.timer.stop();
                    self.show_feedback(command, "Timer Stopped");
                    self.speech.speak("Timer stopped");
                } else {
                    self.speech.speak("There is no active timer.");
                }
            }
            VoiceCommand::PauseTimer => {
                self.close_overlays();
                // Only a running timer pauses; a done or absent timer must
                // not be toggled into a surprise state
                if self.timer.pause() {
                    self.show_feedback(command, "Paused");
                }
            }
            VoiceCommand::ResumeTimer => {
                self.close_overlays();
                if self.timer.resume() {
                    self.show_feedback(command, "Resumed");
                }
            }
            VoiceCommand::StopTts => {
                self.close_overlays();
                self.show_feedback(command, "Silence");
                self.speech.cancel();
            }
            VoiceCommand::Unknown => {}
        }
    }

    fn current_instruction(&self) -> String {
        let step = self
            .inner
            .lock()
            .map(|inner| inner.current_step)
            .unwrap_or(0);
        self.recipe
            .instructions
            .get(step)
            .cloned()
            .unwrap_or_default()
    }

    /// Show a transient feedback overlay, superseding any pending clear.
    fn show_feedback(&self, command: VoiceCommand, label: &str) {
        let feedback = CommandFeedback {
            command,
            label: label.to_string(),
        };
        if let Ok(mut inner) = self.inner.lock() {
            inner.active_feedback = Some(feedback.clone());
        }
        if let Some(emitter) = &self.emitter {
            emitter.emit_command_feedback(CommandFeedbackPayload {
                command,
                label: feedback.label.clone(),
            });
        }

        let inner = self.inner.clone();
        self.feedback_clear
            .schedule(Duration::from_millis(FEEDBACK_CLEAR_MS), move || {
                if let Ok(mut guard) = inner.lock() {
                    guard.active_feedback = None;
                }
            });
    }

    // --- GESTURES ---

    /// Apply a directional gesture: left advances, right goes back.
    /// Silent at the step boundaries; gestures are fire-and-forget.
    pub fn handle_gesture(&self, direction: GestureDirection) {
        if self.is_closed() {
            return;
        }
        if let Some(emitter) = &self.emitter {
            emitter.emit_gesture_detected(GestureDetectedPayload {
                direction,
                timestamp: current_timestamp(),
            });
        }
        match direction {
            GestureDirection::Left => {
                self.next_step();
            }
            GestureDirection::Right => {
                self.prev_step();
            }
        }
    }

    /// Acquire the camera and start the gesture worker.
    ///
    /// A denied or missing camera leaves the recognizer inactive with a
    /// logged warning; no error reaches the session. No-op while already
    /// enabled.
    pub fn enable_gestures(self: &Arc<Self>) {
        if self.is_closed() {
            return;
        }
        let Ok(mut worker) = self.gesture_worker.lock() else {
            return;
        };
        if worker.is_some() {
            return;
        }

        let source = {
            let Ok(mut camera) = self.camera.lock() else {
                return;
            };
            let Some(camera) = camera.as_mut() else {
                crate::debug!("[session] No camera wired, gestures unavailable");
                return;
            };
            match camera.open() {
                Ok(source) => source,
                Err(e) => {
                    crate::warn!("[session] Camera unavailable, gestures stay off: {}", e);
                    return;
                }
            }
        };

        crate::info!("[session] Gestures enabled");
        let detector = MotionDetector::new(self.clock.clone());
        let controller = Arc::downgrade(self);
        *worker = Some(GestureWorkerHandle::spawn(source, detector, move |dir| {
            if let Some(controller) = controller.upgrade() {
                controller.handle_gesture(dir);
            }
        }));
    }

    /// Stop the gesture worker and release the camera. No-op when off.
    pub fn disable_gestures(&self) {
        let handle = self
            .gesture_worker
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());
        if let Some(handle) = handle {
            handle.stop();
            crate::info!("[session] Gestures disabled");
        }
    }

    /// Whether the gesture worker currently owns the camera.
    pub fn gestures_active(&self) -> bool {
        self.gesture_worker
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    // --- SNAPSHOT / CLOSE ---

    /// Synchronous read-only view for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        let (current_step, show_ingredients, show_tips, listening, active_command) = self
            .inner
            .lock()
            .map(|inner| {
                (
                    inner.current_step,
                    inner.show_ingredients,
                    inner.show_tips,
                    inner.listening,
                    inner.active_feedback.clone(),
                )
            })
            .unwrap_or((0, false, false, false, None));

        SessionSnapshot {
            session_id: self.session_id,
            current_step,
            total_steps: self.recipe.instructions.len(),
            show_ingredients,
            show_tips,
            listening,
            gestures_active: self.gestures_active(),
            active_command,
            timer: self.timer.snapshot(),
        }
    }

    /// Close the session: cancel the timer callback, stop the gesture
    /// worker and release the camera, drop pending auto-read and
    /// feedback-clear tasks, silence speech, and notify the caller.
    /// Idempotent; all later actions are no-ops.
    pub fn close_view(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        crate::info!("[session] Closing session {}", self.session_id);

        self.auto_read.cancel();
        self.feedback_clear.cancel();
        self.timer.stop();
        self.disable_gestures();
        self.speech.cancel();

        if let Some(emitter) = &self.emitter {
            emitter.emit_session_closed();
        }
        if let Some(on_close) = &self.on_close {
            on_close();
        }
    }
}

impl Drop for CookingSessionController {
    fn drop(&mut self) {
        // Guarantees no dangling camera access or stray announcements even
        // when the caller forgets close_view
        self.close_view();
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
