// Session data types and the snapshot DTO handed to the presentation layer

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::TimerSnapshot;
use crate::voice::VoiceCommand;

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    /// Spoken form used when reading the ingredient list aloud.
    pub fn spoken(&self) -> String {
        format!("{} {} of {}", self.quantity, self.unit, self.name)
    }
}

/// The caller-owned recipe a session walks through. Never mutated by the
/// session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Ordered instruction steps
    pub instructions: Vec<String>,
    /// Ingredient list for the overlay and read-aloud
    pub ingredients: Vec<Ingredient>,
    /// Optional cooking tips for the tips overlay
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Transient visual confirmation of a recognized command.
///
/// Cosmetic only: cleared automatically after a short delay and never read
/// back by session logic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFeedback {
    pub command: VoiceCommand,
    pub label: String,
}

/// Synchronous read-only view of the session, for polling by the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    /// Index of the step currently showing
    pub current_step: usize,
    /// Total number of instruction steps
    pub total_steps: usize,
    pub show_ingredients: bool,
    pub show_tips: bool,
    /// Whether the speech collaborator is in listening mode
    pub listening: bool,
    /// Whether the gesture recognizer currently owns the camera
    pub gestures_active: bool,
    /// Transient feedback overlay, if one is showing
    pub active_command: Option<CommandFeedback>,
    /// Active timer view, if a timer exists
    pub timer: Option<TimerSnapshot>,
}
