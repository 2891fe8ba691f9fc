// Voice command vocabulary
// The speech-recognition collaborator delivers final transcripts; the
// classifier below maps them onto the command enum with a fixed priority
// order, so "read the next step" moves forward instead of re-reading.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Commands a hands-free session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceCommand {
    /// Advance to the next instruction step
    NextStep,
    /// Go back to the previous instruction step
    PrevStep,
    /// Read the current step aloud
    ReadCurrent,
    /// Open the ingredient overlay and read the list aloud
    ReadIngredients,
    /// Start a timer from the current step's embedded duration
    StartTimer,
    /// Discard the active timer
    StopTimer,
    /// Pause the running timer
    PauseTimer,
    /// Resume the paused timer
    ResumeTimer,
    /// Stop any speech in progress
    StopTts,
    /// Transcript matched nothing
    Unknown,
}

struct TranscriptPatterns {
    ingredients: Regex,
    start_timer: Regex,
    stop_timer: Regex,
    pause_timer: Regex,
    resume_timer: Regex,
    silence: Regex,
    prev: Regex,
    next: Regex,
    read: Regex,
}

fn patterns() -> &'static TranscriptPatterns {
    static PATTERNS: OnceLock<TranscriptPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let build = |p: &str| Regex::new(p).expect("transcript pattern is valid");
        TranscriptPatterns {
            ingredients: build(r"(ingredient|grocery|shopping|list|need)"),
            start_timer: build(r"(start|begin|set)\s+timer"),
            stop_timer: build(r"(stop|cancel|dismiss|end)\s+timer"),
            pause_timer: build(r"(pause|hold)\s+timer"),
            resume_timer: build(r"(resume|restart|continue)\s+timer"),
            silence: build(r"(stop|quiet|hush|silence|off|shut)"),
            prev: build(r"(back|previous|return|last|behind)"),
            next: build(r"(next|forward|continue|go|done|finish|okay|ok|check|skip)"),
            read: build(r"(read|speak|tell|what|repeat|again|current|where)"),
        }
    })
}

impl VoiceCommand {
    /// Classify a final transcript into a command.
    ///
    /// Priority order matters: ingredient queries win over everything,
    /// timer bigrams win over the bare silence/navigation words they
    /// contain, and navigation wins over read/repeat so "read next step"
    /// moves forward.
    pub fn from_transcript(text: &str) -> VoiceCommand {
        let t = text.trim().to_lowercase();
        if t.is_empty() {
            return VoiceCommand::Unknown;
        }

        let p = patterns();
        if p.ingredients.is_match(&t) {
            VoiceCommand::ReadIngredients
        } else if p.start_timer.is_match(&t) {
            VoiceCommand::StartTimer
        } else if p.stop_timer.is_match(&t) {
            VoiceCommand::StopTimer
        } else if p.pause_timer.is_match(&t) {
            VoiceCommand::PauseTimer
        } else if p.resume_timer.is_match(&t) {
            VoiceCommand::ResumeTimer
        } else if p.silence.is_match(&t) {
            VoiceCommand::StopTts
        } else if p.prev.is_match(&t) {
            VoiceCommand::PrevStep
        } else if p.next.is_match(&t) {
            VoiceCommand::NextStep
        } else if p.read.is_match(&t) {
            VoiceCommand::ReadCurrent
        } else {
            VoiceCommand::Unknown
        }
    }
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
