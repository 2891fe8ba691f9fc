// Motion-based swipe detection by frame differencing
//
// No ML model: consecutive downsampled frames are differenced, the motion
// centroid feeds a leaky velocity integrator, and a threshold crossing
// outside the cooldown window emits a directional event. The constants are
// tuned as a set against this exact filter.

use std::sync::Arc;

use serde::Serialize;

use crate::constants::{
    FRAME_CHANNELS, FRAME_HEIGHT, FRAME_WIDTH, GESTURE_COOLDOWN_MS, GESTURE_VELOCITY_THRESHOLD,
    MOTION_DIFF_THRESHOLD, MOTION_MASS_THRESHOLD, MOTION_SAMPLE_STRIDE, VELOCITY_DECAY,
    VELOCITY_LEAK_DIVISOR,
};
use crate::util::Clock;

/// Direction of a detected swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureDirection {
    Left,
    Right,
}

/// Configuration for motion detection
#[derive(Debug, Clone)]
pub struct MotionConfig {
    /// Frame width in pixels
    pub width: usize,
    /// Frame height in pixels
    pub height: usize,
    /// Minimum channel delta for a sampled pixel to count as motion
    pub diff_threshold: i16,
    /// Minimum motion-pixel count before the centroid is trusted
    pub mass_threshold: u32,
    /// Velocity magnitude that triggers a gesture
    pub velocity_threshold: f32,
    /// Minimum time between emitted gestures in milliseconds
    pub cooldown_ms: i64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            diff_threshold: MOTION_DIFF_THRESHOLD,
            mass_threshold: MOTION_MASS_THRESHOLD,
            velocity_threshold: GESTURE_VELOCITY_THRESHOLD,
            cooldown_ms: GESTURE_COOLDOWN_MS,
        }
    }
}

impl MotionConfig {
    /// Expected byte length of one RGBA frame at this geometry.
    pub fn frame_len(&self) -> usize {
        self.width * self.height * FRAME_CHANNELS
    }
}

/// Swipe detector over consecutive RGBA frames.
///
/// Holds exactly one previous frame; the first frame after construction or
/// `reset` only primes that slot and can never produce motion.
pub struct MotionDetector {
    config: MotionConfig,
    clock: Arc<dyn Clock>,
    prev_frame: Option<Vec<u8>>,
    accumulated_velocity: f32,
    last_gesture_ms: i64,
}

impl MotionDetector {
    /// Create a detector with default configuration.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(MotionConfig::default(), clock)
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: MotionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            prev_frame: None,
            accumulated_velocity: 0.0,
            last_gesture_ms: 0,
        }
    }

    /// Process one RGBA frame; returns a gesture when one is recognized.
    ///
    /// Frames whose length does not match the configured geometry are
    /// skipped without touching detector state.
    pub fn process_frame(&mut self, frame: &[u8]) -> Option<GestureDirection> {
        if frame.len() != self.config.frame_len() {
            crate::warn!(
                "[gesture] Skipping frame of {} bytes (expected {})",
                frame.len(),
                self.config.frame_len()
            );
            return None;
        }

        let mut emitted = None;
        if let Some(prev) = &self.prev_frame {
            let (mass, sum_x) = self.diff_frames(frame, prev);

            if mass > self.config.mass_threshold {
                // Leaky integrator, not a true centroid-delta velocity
                let centroid_x = sum_x as f32 / mass as f32;
                self.accumulated_velocity +=
                    centroid_x - self.accumulated_velocity / VELOCITY_LEAK_DIVISOR;
            } else {
                self.accumulated_velocity *= VELOCITY_DECAY;
            }

            let now = self.clock.now_ms();
            if now - self.last_gesture_ms > self.config.cooldown_ms {
                if self.accumulated_velocity < -self.config.velocity_threshold {
                    emitted = Some(GestureDirection::Right);
                } else if self.accumulated_velocity > self.config.velocity_threshold {
                    emitted = Some(GestureDirection::Left);
                }
                if let Some(direction) = emitted {
                    crate::debug!(
                        "[gesture] {:?} (velocity {:.1})",
                        direction,
                        self.accumulated_velocity
                    );
                    self.last_gesture_ms = now;
                    self.accumulated_velocity = 0.0;
                }
            }
        }

        self.prev_frame = Some(frame.to_vec());
        emitted
    }

    /// Difference every 8th byte against the previous frame, accumulating
    /// the motion-pixel count and the sum of their x-coordinates.
    fn diff_frames(&self, current: &[u8], prev: &[u8]) -> (u32, u64) {
        let mut mass: u32 = 0;
        let mut sum_x: u64 = 0;
        let mut i = 0;
        while i < current.len() {
            let delta = (current[i] as i16 - prev[i] as i16).abs();
            if delta > self.config.diff_threshold {
                mass += 1;
                sum_x += ((i / FRAME_CHANNELS) % self.config.width) as u64;
            }
            i += MOTION_SAMPLE_STRIDE;
        }
        (mass, sum_x)
    }

    /// Clear the previous-frame slot and the velocity accumulator.
    ///
    /// After a reset the next frame only primes the slot, so re-enabling
    /// the camera can never emit from stale data.
    pub fn reset(&mut self) {
        self.prev_frame = None;
        self.accumulated_velocity = 0.0;
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Current accumulated velocity, for introspection in tests.
    pub fn velocity(&self) -> f32 {
        self.accumulated_velocity
    }
}

#[cfg(test)]
#[path = "motion_test.rs"]
mod tests;
