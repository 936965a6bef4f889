pub mod actions;
pub mod events;
mod panel;
mod submission;

pub use panel::*;
pub use submission::*;
