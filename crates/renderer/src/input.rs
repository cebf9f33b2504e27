//! Keyboard chords, per-frame actions and window placement tracking.
//!
//! Nothing here touches the window directly: the router turns key events into
//! [`RuntimeActions`], and [`WindowPlacement`] decides which geometry the
//! window should be restored to. The event loop applies the results.
use std::mem;

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::geometry::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ResetSize,
    ToggleFullscreen,
    TogglePause,
    SelectShape(Shape),
    ReloadShaders,
}

/// Maps a key plus the exact modifier set held with it to an action.
pub fn action_for(key: KeyCode, modifiers: ModifiersState) -> Option<Action> {
    let none = ModifiersState::empty();
    let ctrl = ModifiersState::CONTROL;
    let alt = ModifiersState::ALT;

    let action = match key {
        KeyCode::KeyQ | KeyCode::KeyW if modifiers == ctrl => Action::Quit,
        KeyCode::F4 if modifiers == alt => Action::Quit,
        KeyCode::KeyR if modifiers == ctrl => Action::ResetSize,
        KeyCode::F11 if modifiers == none => Action::ToggleFullscreen,
        KeyCode::KeyP if modifiers == ctrl => Action::TogglePause,
        KeyCode::Space if modifiers == none => Action::TogglePause,
        KeyCode::KeyL if modifiers == ctrl => Action::ReloadShaders,
        _ if modifiers == alt => {
            Action::SelectShape(shape_digit(key).and_then(Shape::from_digit)?)
        }
        _ => return None,
    };
    Some(action)
}

fn shape_digit(key: KeyCode) -> Option<u8> {
    match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(1),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(2),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(3),
        _ => None,
    }
}

/// Actions requested since the last frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeActions {
    pub close: bool,
    pub reset_size: bool,
    pub toggle_fullscreen: bool,
    pub toggle_pause: bool,
    pub reload: bool,
    /// Last shape selected; earlier selections in the same frame are dropped.
    pub shape: Option<Shape>,
}

impl RuntimeActions {
    pub fn record(&mut self, action: Action) {
        match action {
            Action::Quit => self.close = true,
            Action::ResetSize => self.reset_size = true,
            // Two toggles within one frame cancel out.
            Action::ToggleFullscreen => self.toggle_fullscreen ^= true,
            Action::TogglePause => self.toggle_pause ^= true,
            Action::ReloadShaders => self.reload = true,
            Action::SelectShape(shape) => self.shape = Some(shape),
        }
    }

    /// Returns the pending actions and resets the record.
    pub fn take(&mut self) -> RuntimeActions {
        mem::take(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == RuntimeActions::default()
    }
}

/// Turns winit keyboard events into [`RuntimeActions`].
#[derive(Debug, Default)]
pub struct InputRouter {
    modifiers: ModifiersState,
    pending: RuntimeActions,
}

impl InputRouter {
    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Handles one key event; chords fire when the key is released.
    pub fn route(&mut self, key: PhysicalKey, state: ElementState) -> Option<Action> {
        if state != ElementState::Released {
            return None;
        }
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        let action = action_for(code, self.modifiers)?;
        tracing::debug!(?action, "key chord");
        self.pending.record(action);
        Some(action)
    }

    /// The window manager's close button.
    pub fn close_requested(&mut self) {
        self.pending.record(Action::Quit);
    }

    pub fn take_actions(&mut self) -> RuntimeActions {
        self.pending.take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Windowed,
    Fullscreen,
}

/// Geometry to apply when returning to windowed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restore {
    /// `None` when the platform never reported a position (Wayland).
    pub position: Option<PhysicalPosition<i32>>,
    pub size: PhysicalSize<u32>,
}

/// Tracks windowed geometry so fullscreen and reset can restore it.
#[derive(Debug, Clone)]
pub struct WindowPlacement {
    mode: WindowMode,
    initial: Restore,
    windowed: Restore,
}

impl WindowPlacement {
    pub fn new(position: Option<PhysicalPosition<i32>>, size: PhysicalSize<u32>) -> Self {
        let initial = Restore { position, size };
        Self {
            mode: WindowMode::Windowed,
            initial,
            windowed: initial,
        }
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn is_fullscreen(&self) -> bool {
        self.mode == WindowMode::Fullscreen
    }

    /// Current remembered windowed geometry.
    pub fn windowed(&self) -> Restore {
        self.windowed
    }

    pub fn moved(&mut self, position: PhysicalPosition<i32>) {
        if self.mode == WindowMode::Windowed {
            self.windowed.position = Some(position);
        }
    }

    pub fn resized(&mut self, size: PhysicalSize<u32>) {
        if self.mode == WindowMode::Windowed && size.width > 0 && size.height > 0 {
            self.windowed.size = size;
        }
    }

    /// Switches mode. Leaving fullscreen yields the geometry to restore.
    pub fn toggle_fullscreen(&mut self) -> Option<Restore> {
        match self.mode {
            WindowMode::Windowed => {
                self.mode = WindowMode::Fullscreen;
                None
            }
            WindowMode::Fullscreen => {
                self.mode = WindowMode::Windowed;
                Some(self.windowed)
            }
        }
    }

    /// The initial geometry, or `None` while fullscreen.
    pub fn reset(&mut self) -> Option<Restore> {
        if self.mode == WindowMode::Fullscreen {
            return None;
        }
        self.windowed = self.initial;
        Some(self.initial)
    }
}
