// Speech synthesis seam
// The actual TTS engine lives outside this crate; the session only needs to
// request speech, cancel it, and know whether something is being spoken.

use regex::Regex;
use std::sync::OnceLock;

/// Interface to the external text-to-speech collaborator.
///
/// Implementations are expected to interrupt any in-progress utterance when
/// `speak` is called again, matching browser speech-synthesis behavior.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text`, replacing any utterance in progress.
    fn speak(&self, text: &str);

    /// Stop speaking immediately.
    fn cancel(&self);

    /// Whether an utterance is currently playing.
    fn is_speaking(&self) -> bool {
        false
    }
}

/// No-op synthesizer for headless use and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeech;

impl SpeechSynthesizer for NullSpeech {
    fn speak(&self, _text: &str) {}

    fn cancel(&self) {}
}

/// Whether `text` contains CJK ideographs.
///
/// Used as a locale heuristic: timer announcements and TTS voice selection
/// phrase Chinese labels differently from English ones.
pub fn contains_cjk(text: &str) -> bool {
    static CJK: OnceLock<Regex> = OnceLock::new();
    let re = CJK.get_or_init(|| {
        Regex::new("[\u{4e00}-\u{9fa5}]").expect("CJK pattern is valid")
    });
    re.is_match(text)
}

#[cfg(test)]
#[path = "speech_test.rs"]
mod tests;
