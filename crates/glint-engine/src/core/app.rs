use glam::Vec2;

use crate::device::Gpu;
use crate::input::{ButtonState, InputEvent, InputState, Key, MouseButton, ScrollDelta};
use crate::time::FpsSample;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// The runtime owns the app and calls these directly. Input arrives through
/// [`on_input`](Self::on_input), whose default routes each event kind to its
/// own handler.
pub trait App {
    /// Called once the window and GPU exist, before the first frame.
    ///
    /// Create shaders, buffers and textures here. An error stops the runtime.
    fn on_init(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let _ = gpu;
        Ok(())
    }

    /// Called for every input event, after `input` has been updated with it.
    fn on_input(&mut self, event: &InputEvent, input: &InputState) -> AppControl {
        match *event {
            InputEvent::Key { key, state, repeat } => self.on_key(key, state, repeat),
            InputEvent::PointerButton { button, state } => self.on_mouse_button(button, state),
            InputEvent::PointerMoved { x, y } => self.on_cursor_moved(Vec2::new(x, y), input),
            InputEvent::Scroll(delta) => self.on_scroll(delta),
            _ => AppControl::Continue,
        }
    }

    fn on_key(&mut self, key: Key, state: ButtonState, repeat: bool) -> AppControl {
        let _ = (key, state, repeat);
        AppControl::Continue
    }

    fn on_mouse_button(&mut self, button: MouseButton, state: ButtonState) -> AppControl {
        let _ = (button, state);
        AppControl::Continue
    }

    /// `position` is in physical pixels, top-left origin.
    fn on_cursor_moved(&mut self, position: Vec2, input: &InputState) -> AppControl {
        let _ = (position, input);
        AppControl::Continue
    }

    fn on_scroll(&mut self, delta: ScrollDelta) -> AppControl {
        let _ = delta;
        AppControl::Continue
    }

    /// Called after the surface was resized (physical pixels).
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called once per FPS sample (about once a second) with the measured rate.
    fn on_fixed_update(&mut self, sample: FpsSample) {
        let _ = sample;
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        keys: Vec<(Key, ButtonState)>,
        cursor: Option<Vec2>,
        scrolled: f32,
    }

    impl App for Probe {
        fn on_key(&mut self, key: Key, state: ButtonState, _repeat: bool) -> AppControl {
            self.keys.push((key, state));
            if key == Key::Q { AppControl::Exit } else { AppControl::Continue }
        }

        fn on_cursor_moved(&mut self, position: Vec2, _input: &InputState) -> AppControl {
            self.cursor = Some(position);
            AppControl::Continue
        }

        fn on_scroll(&mut self, delta: ScrollDelta) -> AppControl {
            self.scrolled += delta.y();
            AppControl::Continue
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Continue
        }
    }

    #[test]
    fn default_on_input_routes_by_kind() {
        let mut app = Probe::default();
        let input = InputState::default();

        let key = InputEvent::Key { key: Key::A, state: ButtonState::Pressed, repeat: false };
        assert_eq!(app.on_input(&key, &input), AppControl::Continue);
        app.on_input(&InputEvent::PointerMoved { x: 4.0, y: 2.0 }, &input);
        app.on_input(&InputEvent::Scroll(ScrollDelta::Line { x: 0.0, y: -1.0 }), &input);
        app.on_input(&InputEvent::Focused(true), &input);

        assert_eq!(app.keys, vec![(Key::A, ButtonState::Pressed)]);
        assert_eq!(app.cursor, Some(Vec2::new(4.0, 2.0)));
        assert_eq!(app.scrolled, -1.0);
    }

    #[test]
    fn handler_exit_propagates() {
        let mut app = Probe::default();
        let quit = InputEvent::Key { key: Key::Q, state: ButtonState::Pressed, repeat: false };
        assert_eq!(app.on_input(&quit, &InputState::default()), AppControl::Exit);
    }
}
