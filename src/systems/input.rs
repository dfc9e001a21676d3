use rustc_hash::FxHashSet;
use winit::keyboard::{KeyCode, ModifiersState};

/// Key-down state polled by controllers during update
#[derive(Default, Debug, Clone)]
pub struct KeyboardState {
    held: FxHashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

/// InputSystem translates raw key events into held-key state and app commands
pub struct InputSystem {
    pub modifiers: ModifiersState,
    pub keyboard: KeyboardState,
}

impl InputSystem {
    pub fn new() -> Self {
        Self {
            modifiers: ModifiersState::empty(),
            keyboard: KeyboardState::new(),
        }
    }

    pub fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Records the key transition; returns a command only on the initial press.
    pub fn handle_key(&mut self, keycode: KeyCode, pressed: bool, repeat: bool) -> Option<InputCommand> {
        self.keyboard.set(keycode, pressed);
        if !pressed || repeat {
            return None;
        }
        match keycode {
            KeyCode::Escape => Some(InputCommand::Exit),
            KeyCode::Enter => Some(InputCommand::StartGame),
            KeyCode::KeyP => Some(InputCommand::TogglePause),
            KeyCode::F3 => Some(InputCommand::ToggleDebug),
            KeyCode::KeyQ if self.modifiers.control_key() => Some(InputCommand::Exit),
            _ => None,
        }
    }

    /// Focus loss drops every held key so the runner doesn't keep running.
    pub fn focus_lost(&mut self) {
        self.keyboard.release_all();
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands that the input system can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Exit,
    StartGame,
    TogglePause,
    ToggleDebug,
}
