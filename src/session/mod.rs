// Hands-free cooking session orchestration

mod controller;
mod types;

pub use controller::CookingSessionController;
pub use types::{CommandFeedback, Ingredient, Recipe, SessionSnapshot};
