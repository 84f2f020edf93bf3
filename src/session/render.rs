use crate::hints::{Hint, SelectionState};
use crate::platform::{Platform, ScreenId};

/// Redraws the current match set as the only overlay content.
pub(crate) fn draw_state(platform: &mut dyn Platform, screen: ScreenId, state: &SelectionState) {
    platform.screen_clear(screen);
    platform.hint_draw(screen, state.matched());
    platform.commit();
}

/// Puts a single centered message box on screen, replacing any hints.
pub(crate) fn show_message(
    platform: &mut dyn Platform,
    screen: ScreenId,
    message: &str,
    hint_h: i32,
) {
    const MESSAGE_WIDTH: i32 = 250;

    let (screen_w, _) = platform.screen_dimensions(screen);
    let message_hint = Hint {
        x: (screen_w - MESSAGE_WIDTH) / 2,
        y: 50,
        w: MESSAGE_WIDTH,
        h: hint_h,
        label: message.to_string(),
        original_index: 0,
        element_name: None,
        highlighted: false,
    };

    platform.screen_clear(screen);
    platform.hint_draw(screen, std::slice::from_ref(&message_hint));
    platform.commit();
}
