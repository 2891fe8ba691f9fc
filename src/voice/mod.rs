// Voice command vocabulary and transcript classification

mod command;
pub use command::VoiceCommand;
