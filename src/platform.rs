use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::hints::Hint;

/// Opaque handle to one physical screen, issued by the platform backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Space,
    Backspace,
    Escape,
    CtrlU,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Boundary to the windowing system. Implementations live outside this
/// crate (X11, Wayland, win32, ...); this trait carries only what the
/// selection pipeline needs from them.
///
/// Draw calls may be queued until `commit`.
pub trait Platform {
    fn screen_dimensions(&self, screen: ScreenId) -> (i32, i32);
    fn screen_offset(&self, screen: ScreenId) -> (i32, i32);

    /// Screen under the pointer plus the pointer position relative to it.
    fn mouse_position(&mut self) -> (ScreenId, i32, i32);
    fn mouse_move(&mut self, screen: ScreenId, x: i32, y: i32);
    fn mouse_hide(&mut self);
    fn mouse_show(&mut self);

    fn input_grab_keyboard(&mut self);
    fn input_ungrab_keyboard(&mut self);
    /// Next key event, or None once `timeout` elapses with no input.
    /// A zero timeout blocks indefinitely.
    fn input_next_event(&mut self, timeout: Duration) -> Option<KeyEvent>;

    fn hint_draw(&mut self, screen: ScreenId, hints: &[Hint]);
    fn screen_clear(&mut self, screen: ScreenId);
    fn draw_loading_cursor(&mut self, screen: ScreenId, x: i32, y: i32);
    fn commit(&mut self);
}

/// Factory seam for the platform backend. No backend is compiled into
/// this crate; embedders supply their own `Platform` implementation.
pub fn default_platform() -> AppResult<Box<dyn Platform>> {
    Err(AppError::unsupported(
        "no platform backend compiled into this build",
    ))
}
