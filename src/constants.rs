//! Centralized constants for the cooking session engine.
//!
//! All tuning values are defined here with documentation explaining their
//! purpose and constraints. The gesture thresholds in particular are
//! empirical: they were tuned together against the leaky-integrator
//! velocity filter and must be changed as a set, if at all.

// =============================================================================
// FRAME GEOMETRY
// =============================================================================

/// Width of the downsampled camera frame in pixels.
///
/// Frames are processed at a small fixed resolution for performance; the
/// frame source is expected to downscale to this size before handing
/// frames to the detector.
pub const FRAME_WIDTH: usize = 160;

/// Height of the downsampled camera frame in pixels.
pub const FRAME_HEIGHT: usize = 120;

/// Bytes per pixel in a frame buffer (RGBA).
pub const FRAME_CHANNELS: usize = 4;

/// Expected byte length of one frame buffer.
pub const FRAME_LEN: usize = FRAME_WIDTH * FRAME_HEIGHT * FRAME_CHANNELS;

/// Byte stride between sampled indices when differencing frames.
///
/// Sampling every 8th byte of RGBA data reads one color channel for every
/// second pixel, which is enough signal for coarse motion detection at a
/// quarter of the cost of a full scan.
pub const MOTION_SAMPLE_STRIDE: usize = 8;

// =============================================================================
// MOTION DETECTION THRESHOLDS
// =============================================================================

/// Minimum absolute channel delta for a sampled pixel to count as motion.
pub const MOTION_DIFF_THRESHOLD: i16 = 35;

/// Minimum number of motion pixels in a frame before the centroid is
/// trusted.
///
/// Below this gate the frame is treated as sensor noise and the velocity
/// accumulator decays instead of integrating a bogus centroid.
pub const MOTION_MASS_THRESHOLD: u32 = 200;

/// Divisor applied to the accumulated velocity in the leaky integrator
/// (`velocity += centroid - velocity / LEAK`).
pub const VELOCITY_LEAK_DIVISOR: f32 = 5.0;

/// Decay factor applied to the accumulated velocity on frames with no
/// qualifying motion.
pub const VELOCITY_DECAY: f32 = 0.8;

/// Magnitude the accumulated velocity must exceed to emit a gesture.
///
/// Negative velocity emits a rightward gesture, positive a leftward one.
pub const GESTURE_VELOCITY_THRESHOLD: f32 = 25.0;

/// Minimum time between two emitted gestures in milliseconds.
///
/// A single hand sweep spans many frames; the cooldown collapses it into
/// one event.
pub const GESTURE_COOLDOWN_MS: i64 = 1200;

// =============================================================================
// SESSION TIMING
// =============================================================================

/// How long a transient command feedback overlay stays visible, in
/// milliseconds. A newer feedback supersedes the pending clear.
pub const FEEDBACK_CLEAR_MS: u64 = 1000;

/// Delay before a step change is read aloud, in milliseconds.
///
/// Rapid navigation (voice plus gesture in quick succession) should speak
/// only the step the user lands on, so the read is debounced rather than
/// queued.
pub const AUTO_READ_DELAY_MS: u64 = 300;
