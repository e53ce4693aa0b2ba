//! Input subsystem.
//!
//! Public API is platform-agnostic; `platform::winit` translates window
//! events into [`InputEvent`]s for the runtime.

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, ScrollDelta};
