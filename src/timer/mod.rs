// Countdown timer for step durations

mod smart;
mod state;

pub use smart::{SmartTimer, TimerSnapshot};
pub use state::{TimerPhase, TimerState};
