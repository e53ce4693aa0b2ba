use std::fmt;

/// Keyboard key identifier.
///
/// Keys without a variant map to `Key::Unknown` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Pressed/released state shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    #[inline]
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Scroll amount. `Line` comes from wheels, `Pixel` from touchpads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScrollDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl ScrollDelta {
    /// Vertical component; positive scrolls up / away from the user.
    #[inline]
    pub fn y(self) -> f32 {
        match self {
            ScrollDelta::Line { y, .. } | ScrollDelta::Pixel { y, .. } => y,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Positions are physical pixels with a top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: ButtonState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved { x: f32, y: f32 },
    PointerButton { button: MouseButton, state: ButtonState },
    Scroll(ScrollDelta),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}
