//! souschef - hands-free cooking session engine.
//!
//! Walks a user through recipe steps without touch input: voice commands
//! and camera swipe gestures drive navigation, embedded durations in the
//! instruction text become pausable countdown timers, and everything the
//! presentation layer needs is one synchronous snapshot away.
//!
//! Speech recognition/synthesis and the camera device live outside this
//! crate; they plug in through the [`speech::SpeechSynthesizer`] and
//! [`gesture::CameraSource`] traits.

pub mod constants;
pub mod events;
pub mod gesture;
pub mod parsing;
pub mod session;
pub mod speech;
pub mod timer;
pub mod util;
pub mod voice;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

pub use gesture::{CameraError, CameraSource, FrameSource, GestureDirection};
pub use parsing::{find_duration_in_text, DurationMatch};
pub use session::{CookingSessionController, Ingredient, Recipe, SessionSnapshot};
pub use speech::{NullSpeech, SpeechSynthesizer};
pub use timer::{SmartTimer, TimerPhase, TimerSnapshot, TimerState};
pub use voice::VoiceCommand;
