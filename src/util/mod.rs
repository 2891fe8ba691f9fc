//! Shared utilities for the session engine.
//!
//! - `clock`: wall-clock abstraction so timer arithmetic is testable
//! - `delay`: cancelable one-shot task scheduling on a dedicated thread

mod clock;
mod delay;

pub use clock::{Clock, ManualClock, SystemClock};
pub use delay::DelayedTask;
