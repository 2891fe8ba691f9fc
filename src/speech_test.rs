use super::*;

#[test]
fn test_contains_cjk_detects_chinese_text() {
    assert!(contains_cjk("三十分鐘"));
    assert!(contains_cjk("mix 半小時"));
}

#[test]
fn test_contains_cjk_false_for_latin_text() {
    assert!(!contains_cjk("45 mins"));
    assert!(!contains_cjk(""));
    assert!(!contains_cjk("crème brûlée"));
}

#[test]
fn test_null_speech_is_inert() {
    let speech = NullSpeech;
    speech.speak("anything");
    speech.cancel();
    assert!(!speech.is_speaking());
}
