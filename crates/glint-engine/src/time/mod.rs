//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - call `FrameClock::tick()` once per presented frame to obtain `FrameTime`
//! - feed each frame to `FpsCounter` for the once-per-second rate and fixed update

mod fps;
mod frame_clock;

pub use fps::{FpsCounter, FpsSample};
pub use frame_clock::{FrameClock, FrameTime};
