// Text parsing for instruction content

mod duration;
pub use duration::{
    duration_to_seconds, find_duration_in_text, parse_duration_to_seconds, parse_fuzzy_number,
    DurationMatch,
};
