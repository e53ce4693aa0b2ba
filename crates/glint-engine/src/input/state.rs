use std::collections::HashSet;

use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in physical pixels, `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds one event into the state.
    ///
    /// Returns `false` for a key or button event that changes nothing
    /// (a release without a press, or a repeated press).
    pub fn apply_event(&mut self, ev: &InputEvent) -> bool {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Keys released while unfocused never arrive.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((*x, *y)),
            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, .. } => {
                return match state {
                    ButtonState::Pressed => self.keys_down.insert(*key),
                    ButtonState::Released => self.keys_down.remove(key),
                };
            }

            InputEvent::PointerButton { button, state } => {
                return match state {
                    ButtonState::Pressed => self.buttons_down.insert(*button),
                    ButtonState::Released => self.buttons_down.remove(button),
                };
            }

            InputEvent::Scroll(_) => {}
        }
        true
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn key_press_and_release() {
        let mut s = InputState::default();
        assert!(s.apply_event(&key(Key::Q, ButtonState::Pressed)));
        assert!(s.key_down(Key::Q));
        assert!(!s.apply_event(&key(Key::Q, ButtonState::Pressed)));
        assert!(s.apply_event(&key(Key::Q, ButtonState::Released)));
        assert!(!s.key_down(Key::Q));
        assert!(!s.apply_event(&key(Key::Q, ButtonState::Released)));
    }

    #[test]
    fn focus_loss_clears_held_input() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::ArrowLeft, ButtonState::Pressed));
        s.apply_event(&InputEvent::PointerButton { button: MouseButton::Left, state: ButtonState::Pressed });
        s.apply_event(&InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
        assert!(!s.button_down(MouseButton::Left));
    }

    #[test]
    fn pointer_tracking() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        assert_eq!(s.pointer_pos, Some((3.0, 4.0)));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }

    #[test]
    fn modifiers_replace() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::ModifiersChanged(Modifiers { shift: true, ..Default::default() }));
        assert!(s.modifiers.any());
        s.apply_event(&InputEvent::ModifiersChanged(Modifiers::default()));
        assert!(!s.modifiers.any());
    }
}
