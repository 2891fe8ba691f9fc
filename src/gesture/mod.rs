// Air gesture recognition from camera frames

mod motion;
mod worker;

pub use motion::{GestureDirection, MotionConfig, MotionDetector};
pub use worker::{CameraError, CameraSource, FrameSource, GestureWorkerHandle};
