use super::*;
use crate::gesture::{CameraError, FrameSource, MotionConfig};
use crate::session::Ingredient;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

#[derive(Default)]
struct MockSpeech {
    spoken: Mutex<Vec<String>>,
    cancels: AtomicUsize,
}

impl MockSpeech {
    fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    fn last_spoken(&self) -> Option<String> {
        self.spoken.lock().unwrap().last().cloned()
    }
}

impl SpeechSynthesizer for MockSpeech {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct MockEmitter {
    steps: Mutex<Vec<usize>>,
    gestures: Mutex<Vec<GestureDirection>>,
    feedback: Mutex<Vec<String>>,
    closed: AtomicUsize,
}

impl SessionEventEmitter for MockEmitter {
    fn emit_step_changed(&self, payload: StepChangedPayload) {
        self.steps.lock().unwrap().push(payload.step_index);
    }

    fn emit_gesture_detected(&self, payload: GestureDetectedPayload) {
        self.gestures.lock().unwrap().push(payload.direction);
    }

    fn emit_command_feedback(&self, payload: CommandFeedbackPayload) {
        self.feedback.lock().unwrap().push(payload.label);
    }

    fn emit_session_closed(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Camera that always opens, producing one motion burst then stillness.
struct FakeCamera {
    released: Arc<AtomicBool>,
}

struct FakeFrames {
    frames: Vec<Vec<u8>>,
    index: usize,
    released: Arc<AtomicBool>,
}

impl FrameSource for FakeFrames {
    fn next_frame(&mut self) -> Option<Vec<u8>> {
        thread::sleep(Duration::from_millis(5));
        let frame = self.frames.get(self.index).cloned();
        if self.index + 1 < self.frames.len() {
            self.index += 1;
        }
        frame
    }
}

impl Drop for FakeFrames {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

impl CameraSource for FakeCamera {
    fn open(&mut self) -> Result<Box<dyn FrameSource>, CameraError> {
        let len = MotionConfig::default().frame_len();
        Ok(Box::new(FakeFrames {
            frames: vec![vec![0u8; len], vec![60u8; len]],
            index: 0,
            released: self.released.clone(),
        }))
    }
}

/// Camera that always fails to open.
struct DeniedCamera;

impl CameraSource for DeniedCamera {
    fn open(&mut self) -> Result<Box<dyn FrameSource>, CameraError> {
        Err(CameraError::PermissionDenied)
    }
}

fn recipe() -> Arc<Recipe> {
    Arc::new(Recipe {
        instructions: vec![
            "Chop the onions".to_string(),
            "Bake for 45 mins at 200C".to_string(),
            "Serve warm".to_string(),
        ],
        ingredients: vec![
            Ingredient {
                name: "flour".to_string(),
                quantity: 2.0,
                unit: "cups".to_string(),
            },
            Ingredient {
                name: "salt".to_string(),
                quantity: 1.0,
                unit: "tsp".to_string(),
            },
        ],
        tips: vec!["Use a sharp knife".to_string()],
    })
}

fn controller() -> (Arc<CookingSessionController>, Arc<MockSpeech>) {
    let speech = Arc::new(MockSpeech::default());
    let controller = Arc::new(CookingSessionController::new(recipe(), speech.clone()));
    (controller, speech)
}

#[test]
fn test_navigation_respects_bounds() {
    let (session, _speech) = controller();

    assert!(!session.prev_step());
    assert_eq!(session.snapshot().current_step, 0);

    assert!(session.next_step());
    assert!(session.next_step());
    assert_eq!(session.snapshot().current_step, 2);

    // Third call runs off the end of the 3-step recipe
    assert!(!session.next_step());
    assert_eq!(session.snapshot().current_step, 2);

    assert!(session.prev_step());
    assert_eq!(session.snapshot().current_step, 1);
}

#[test]
fn test_navigation_closes_overlays() {
    let (session, _speech) = controller();
    session.set_show_ingredients(true);
    session.set_show_tips(true);

    session.next_step();
    let snap = session.snapshot();
    assert!(!snap.show_ingredients);
    assert!(!snap.show_tips);
}

#[test]
fn test_voice_next_at_last_step_speaks_explanation() {
    let (session, speech) = controller();
    session.next_step();
    session.next_step();

    session.handle_voice_command(VoiceCommand::NextStep, "next");
    assert_eq!(speech.last_spoken().unwrap(), "That was the last step.");
    assert_eq!(session.snapshot().current_step, 2);
}

#[test]
fn test_voice_prev_at_first_step_speaks_explanation() {
    let (session, speech) = controller();
    session.handle_voice_command(VoiceCommand::PrevStep, "back");
    assert_eq!(speech.last_spoken().unwrap(), "You are at the first step.");
}

#[test]
fn test_voice_read_current_speaks_instruction() {
    let (session, speech) = controller();
    session.handle_voice_command(VoiceCommand::ReadCurrent, "repeat");
    assert_eq!(speech.last_spoken().unwrap(), "Chop the onions");
    assert_eq!(
        session.snapshot().active_command.unwrap().label,
        "Reading..."
    );
}

#[test]
fn test_voice_read_ingredients_opens_overlay_and_reads_list() {
    let (session, speech) = controller();
    session.handle_voice_command(VoiceCommand::ReadIngredients, "what do i need");

    assert!(session.snapshot().show_ingredients);
    assert_eq!(
        speech.last_spoken().unwrap(),
        "You need: 2 cups of flour. 1 tsp of salt"
    );
}

#[test]
fn test_voice_start_timer_uses_current_step_duration() {
    let (session, speech) = controller();
    session.next_step(); // "Bake for 45 mins at 200C"

    session.handle_voice_command(VoiceCommand::StartTimer, "start timer");

    let timer = session.snapshot().timer.unwrap();
    assert_eq!(timer.label, "45 mins");
    assert_eq!(timer.status, "running");
    assert_eq!(timer.remaining_seconds, 2700);
    assert_eq!(
        speech.last_spoken().unwrap(),
        "Starting timer for 45 mins"
    );
}

#[test]
fn test_voice_start_timer_without_duration_starts_nothing() {
    let (session, speech) = controller();
    // Step 0 has no duration text
    session.handle_voice_command(VoiceCommand::StartTimer, "start timer");

    assert!(session.snapshot().timer.is_none());
    assert_eq!(
        speech.last_spoken().unwrap(),
        "I didn't find a timer in this step."
    );
    assert!(session.snapshot().active_command.is_none());
}

#[test]
fn test_voice_stop_timer() {
    let (session, speech) = controller();
    session.handle_voice_command(VoiceCommand::StopTimer, "stop timer");
    assert_eq!(speech.last_spoken().unwrap(), "There is no active timer.");

    session.next_step();
    session.handle_voice_command(VoiceCommand::StartTimer, "start timer");
    session.handle_voice_command(VoiceCommand::StopTimer, "stop timer");
    assert_eq!(speech.last_spoken().unwrap(), "Timer stopped");
    assert!(session.snapshot().timer.is_none());
}

#[test]
fn test_voice_pause_and_resume_are_state_checked() {
    let (session, _speech) = controller();

    // Nothing to pause or resume yet; no feedback appears
    session.handle_voice_command(VoiceCommand::PauseTimer, "pause timer");
    assert!(session.snapshot().active_command.is_none());
    session.handle_voice_command(VoiceCommand::ResumeTimer, "resume timer");
    assert!(session.snapshot().active_command.is_none());

    session.next_step();
    session.handle_voice_command(VoiceCommand::StartTimer, "start timer");

    // Resume on a running timer must not pause it
    session.handle_voice_command(VoiceCommand::ResumeTimer, "resume timer");
    assert_eq!(session.snapshot().timer.unwrap().status, "running");

    session.handle_voice_command(VoiceCommand::PauseTimer, "pause timer");
    assert_eq!(session.snapshot().timer.unwrap().status, "paused");
    assert_eq!(session.snapshot().active_command.unwrap().label, "Paused");

    // Pause again is a no-op
    session.handle_voice_command(VoiceCommand::PauseTimer, "pause timer");
    assert_eq!(session.snapshot().timer.unwrap().status, "paused");

    session.handle_voice_command(VoiceCommand::ResumeTimer, "resume timer");
    assert_eq!(session.snapshot().timer.unwrap().status, "running");
}

#[test]
fn test_voice_stop_tts_cancels_speech() {
    let (session, speech) = controller();
    session.handle_voice_command(VoiceCommand::StopTts, "quiet");
    assert_eq!(speech.cancels.load(Ordering::SeqCst), 1);
    assert_eq!(session.snapshot().active_command.unwrap().label, "Silence");
}

#[test]
fn test_unknown_command_does_nothing() {
    let (session, speech) = controller();
    session.handle_voice_command(VoiceCommand::Unknown, "blah");
    assert!(speech.spoken().is_empty());
    assert!(session.snapshot().active_command.is_none());
    assert_eq!(session.snapshot().current_step, 0);
}

#[test]
fn test_handle_transcript_classifies_and_dispatches() {
    let (session, _speech) = controller();
    session.handle_transcript("next step please");
    assert_eq!(session.snapshot().current_step, 1);
}

#[test]
fn test_feedback_clears_after_delay() {
    let (session, _speech) = controller();
    session.handle_voice_command(VoiceCommand::ReadCurrent, "repeat");
    assert!(session.snapshot().active_command.is_some());

    thread::sleep(Duration::from_millis(1_300));
    assert!(session.snapshot().active_command.is_none());
}

#[test]
fn test_auto_read_fires_while_listening() {
    let (session, speech) = controller();
    session.set_listening(true);

    thread::sleep(Duration::from_millis(500));
    assert_eq!(speech.spoken(), vec!["Chop the onions"]);
}

#[test]
fn test_auto_read_debounces_rapid_navigation() {
    let (session, speech) = controller();
    session.set_listening(true);
    // Move twice before the 300ms read delay elapses
    session.next_step();
    session.next_step();

    thread::sleep(Duration::from_millis(500));
    // Only the step landed on is read
    assert_eq!(speech.spoken(), vec!["Serve warm"]);
}

#[test]
fn test_leaving_listening_cancels_pending_read() {
    let (session, speech) = controller();
    session.set_listening(true);
    session.set_listening(false);

    thread::sleep(Duration::from_millis(500));
    assert!(speech.spoken().is_empty());
}

#[test]
fn test_gestures_navigate_and_release_camera() {
    let released = Arc::new(AtomicBool::new(false));
    let speech = Arc::new(MockSpeech::default());
    let session = Arc::new(
        CookingSessionController::new(recipe(), speech).with_camera(Box::new(FakeCamera {
            released: released.clone(),
        })),
    );

    session.enable_gestures();
    assert!(session.snapshot().gestures_active);

    // The scripted motion burst swipes left, which advances one step
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while session.snapshot().current_step == 0 && std::time::Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(session.snapshot().current_step, 1);

    session.disable_gestures();
    assert!(!session.snapshot().gestures_active);
    assert!(released.load(Ordering::SeqCst));
}

#[test]
fn test_enable_gestures_without_camera_stays_inactive() {
    let (session, _speech) = controller();
    session.enable_gestures();
    assert!(!session.snapshot().gestures_active);
}

#[test]
fn test_denied_camera_stays_inactive_without_error() {
    let speech = Arc::new(MockSpeech::default());
    let session = Arc::new(
        CookingSessionController::new(recipe(), speech).with_camera(Box::new(DeniedCamera)),
    );

    session.enable_gestures();
    assert!(!session.snapshot().gestures_active);
    // The session is still fully usable
    assert!(session.next_step());
}

#[test]
fn test_handle_gesture_maps_directions() {
    let (session, _speech) = controller();
    session.handle_gesture(GestureDirection::Left);
    assert_eq!(session.snapshot().current_step, 1);
    session.handle_gesture(GestureDirection::Right);
    assert_eq!(session.snapshot().current_step, 0);
    // Boundary gestures are silent no-ops
    session.handle_gesture(GestureDirection::Right);
    assert_eq!(session.snapshot().current_step, 0);
}

#[test]
fn test_emitter_sees_session_events() {
    let speech = Arc::new(MockSpeech::default());
    let emitter = Arc::new(MockEmitter::default());
    let session = Arc::new(
        CookingSessionController::new(recipe(), speech).with_emitter(emitter.clone()),
    );

    session.next_step();
    session.handle_voice_command(VoiceCommand::ReadCurrent, "repeat");
    session.handle_gesture(GestureDirection::Left);
    session.close_view();

    assert_eq!(emitter.steps.lock().unwrap().clone(), vec![1, 2]);
    assert_eq!(
        emitter.gestures.lock().unwrap().clone(),
        vec![GestureDirection::Left]
    );
    assert_eq!(
        emitter.feedback.lock().unwrap().clone(),
        vec!["Reading...".to_string()]
    );
    assert_eq!(emitter.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_close_view_cancels_pending_work_and_freezes_session() {
    let closed_hook = Arc::new(AtomicUsize::new(0));
    let hook = closed_hook.clone();
    let speech = Arc::new(MockSpeech::default());
    let session = Arc::new(
        CookingSessionController::new(recipe(), speech.clone())
            .with_on_close(move || {
                hook.fetch_add(1, Ordering::SeqCst);
            }),
    );

    session.next_step();
    session.handle_voice_command(VoiceCommand::StartTimer, "start timer");
    session.set_listening(true);

    session.close_view();

    // Pending auto-read must not speak after close
    let spoken_at_close = speech.spoken().len();
    thread::sleep(Duration::from_millis(500));
    assert_eq!(speech.spoken().len(), spoken_at_close);

    // Timer is gone, speech was cancelled, the hook ran once
    assert!(session.snapshot().timer.is_none());
    assert!(speech.cancels.load(Ordering::SeqCst) >= 1);
    assert_eq!(closed_hook.load(Ordering::SeqCst), 1);

    // Everything after close is a no-op
    assert!(session.is_closed());
    assert!(!session.next_step());
    session.handle_voice_command(VoiceCommand::ReadCurrent, "repeat");
    assert_eq!(speech.spoken().len(), spoken_at_close);

    // Closing again does not re-run the hook
    session.close_view();
    assert_eq!(closed_hook.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_recipe_is_inert() {
    let speech = Arc::new(MockSpeech::default());
    let session = Arc::new(CookingSessionController::new(
        Arc::new(Recipe::default()),
        speech.clone(),
    ));

    assert!(!session.next_step());
    assert!(!session.prev_step());
    session.handle_voice_command(VoiceCommand::StartTimer, "start timer");
    assert!(speech.spoken().is_empty());

    let snap = session.snapshot();
    assert_eq!(snap.current_step, 0);
    assert_eq!(snap.total_steps, 0);
}

#[test]
fn test_snapshot_serializes_camel_case() {
    let (session, _speech) = controller();
    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["currentStep"], 0);
    assert_eq!(json["totalSteps"], 3);
    assert_eq!(json["showIngredients"], false);
    assert_eq!(json["gesturesActive"], false);
    assert!(json["sessionId"].is_string());
}
