// Gesture worker thread - pulls camera frames through the motion detector
//
// The worker owns the frame source for its whole lifetime: stopping the
// worker joins the thread and drops the source, which is what releases the
// camera. Stop is an O(1) flag flip; the loop observes it within one frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::motion::{GestureDirection, MotionDetector};

/// Errors opening a camera frame source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    /// The user denied camera access
    #[error("camera permission denied")]
    PermissionDenied,
    /// No usable camera device exists
    #[error("no camera device available")]
    Unavailable,
    /// Backend-specific failure
    #[error("camera backend error: {0}")]
    Backend(String),
}

/// A live stream of downsampled RGBA frames.
///
/// `next_frame` blocks at the source's frame rate. Dropping the source must
/// release the underlying camera device.
pub trait FrameSource: Send {
    /// Block until the next frame is available; `None` ends the stream.
    fn next_frame(&mut self) -> Option<Vec<u8>>;
}

/// Camera abstraction: something that can open a frame source.
///
/// The session never manages permission UI; a denied or missing camera
/// surfaces here as an error and the recognizer simply stays inactive.
pub trait CameraSource: Send {
    fn open(&mut self) -> Result<Box<dyn FrameSource>, CameraError>;
}

/// Handle to the frame-processing thread.
///
/// Dropping the handle stops the loop, joins the thread, and releases the
/// camera by dropping the frame source.
pub struct GestureWorkerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl GestureWorkerHandle {
    /// Spawn the frame loop. `on_gesture` runs on the worker thread for
    /// every recognized swipe.
    pub fn spawn<F>(source: Box<dyn FrameSource>, detector: MotionDetector, on_gesture: F) -> Self
    where
        F: Fn(GestureDirection) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let thread = thread::Builder::new()
            .name("souschef-gesture".to_string())
            .spawn(move || frame_loop(source, detector, on_gesture, &stop_flag))
            .expect("failed to spawn gesture thread");

        Self {
            stop,
            thread: Some(thread),
        }
    }

    /// Request the loop to stop and wait for the camera to be released.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for GestureWorkerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Main loop for the gesture thread. Exits when stopped or when the frame
/// source ends; the source is dropped on exit, releasing the camera.
fn frame_loop<F>(
    mut source: Box<dyn FrameSource>,
    mut detector: MotionDetector,
    on_gesture: F,
    stop: &AtomicBool,
) where
    F: Fn(GestureDirection),
{
    crate::debug!("[gesture] Frame loop started");
    while !stop.load(Ordering::SeqCst) {
        match source.next_frame() {
            Some(frame) => {
                if let Some(direction) = detector.process_frame(&frame) {
                    on_gesture(direction);
                }
            }
            None => {
                crate::info!("[gesture] Frame source ended");
                break;
            }
        }
    }
    crate::debug!("[gesture] Frame loop stopped");
}

#[cfg(test)]
#[path = "worker_test.rs"]
mod tests;
