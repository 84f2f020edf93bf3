use std::collections::VecDeque;
use std::time::Duration;

use crate::config::Config;
use crate::detect::{DetectionResult, DetectorStrategy, UiElement};
use crate::hints::{Hint, HintMode};
use crate::platform::{Key, KeyEvent, Platform, ScreenId};

use super::{SessionOutcome, SmartHintSession};

struct MockPlatform {
    events: VecDeque<KeyEvent>,
    dimensions: (i32, i32),
    offset: (i32, i32),
    moves: Vec<(i32, i32)>,
    draws: Vec<Vec<Hint>>,
    clears: usize,
    grabs: usize,
    ungrabs: usize,
}

impl MockPlatform {
    fn with_keys(keys: &[Key]) -> Self {
        Self {
            events: keys.iter().map(|&key| KeyEvent::press(key)).collect(),
            dimensions: (1000, 600),
            offset: (0, 0),
            moves: Vec::new(),
            draws: Vec::new(),
            clears: 0,
            grabs: 0,
            ungrabs: 0,
        }
    }
}

impl Platform for MockPlatform {
    fn screen_dimensions(&self, _screen: ScreenId) -> (i32, i32) {
        self.dimensions
    }

    fn screen_offset(&self, _screen: ScreenId) -> (i32, i32) {
        self.offset
    }

    fn mouse_position(&mut self) -> (ScreenId, i32, i32) {
        (ScreenId(0), self.dimensions.0 / 2, self.dimensions.1 / 2)
    }

    fn mouse_move(&mut self, _screen: ScreenId, x: i32, y: i32) {
        self.moves.push((x, y));
    }

    fn mouse_hide(&mut self) {}

    fn mouse_show(&mut self) {}

    fn input_grab_keyboard(&mut self) {
        self.grabs += 1;
    }

    fn input_ungrab_keyboard(&mut self) {
        self.ungrabs += 1;
    }

    fn input_next_event(&mut self, _timeout: Duration) -> Option<KeyEvent> {
        // A drained script cancels, so a buggy loop cannot spin forever.
        Some(
            self.events
                .pop_front()
                .unwrap_or(KeyEvent::press(Key::Escape)),
        )
    }

    fn hint_draw(&mut self, _screen: ScreenId, hints: &[Hint]) {
        self.draws.push(hints.to_vec());
    }

    fn screen_clear(&mut self, _screen: ScreenId) {
        self.clears += 1;
    }

    fn draw_loading_cursor(&mut self, _screen: ScreenId, _x: i32, _y: i32) {}

    fn commit(&mut self) {}
}

struct StaticStrategy {
    elements: Vec<UiElement>,
    names_available: bool,
    fail: bool,
}

impl StaticStrategy {
    fn named(names: &[&str]) -> Self {
        let elements = names
            .iter()
            .enumerate()
            .map(|(i, name)| UiElement {
                x: i as i32 * 100,
                y: 0,
                w: 40,
                h: 40,
                name: Some(name.to_string()),
                role: None,
            })
            .collect();
        Self {
            elements,
            names_available: true,
            fail: false,
        }
    }

    fn nameless(count: usize) -> Self {
        let elements = (0..count)
            .map(|i| UiElement {
                x: i as i32 * 100,
                y: 0,
                w: 40,
                h: 40,
                name: None,
                role: None,
            })
            .collect();
        Self {
            elements,
            names_available: false,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            elements: Vec::new(),
            names_available: true,
            fail: true,
        }
    }
}

impl DetectorStrategy for StaticStrategy {
    fn name(&self) -> &'static str {
        "static"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn detect(&mut self) -> DetectionResult {
        if self.fail {
            return DetectionResult::failed(-1, "backend not reachable");
        }
        DetectionResult::detected(self.elements.clone(), "static", self.names_available)
    }
}

fn run_session(
    platform: &mut MockPlatform,
    config: &Config,
    strategy: StaticStrategy,
) -> SessionOutcome {
    SmartHintSession::new(config, platform)
        .run(vec![Box::new(strategy)])
        .expect("session should run")
}

#[test]
fn typing_a_unique_digit_prefix_auto_selects() {
    let mut platform = MockPlatform::with_keys(&[Key::Char('0'), Key::Char('3')]);
    let config = Config::default();
    let names: Vec<String> = (0..10).map(|i| format!("item {i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let outcome = run_session(&mut platform, &config, StaticStrategy::named(&name_refs));

    // Ten hints are labeled "01".."10"; "03" is the third element, and
    // the selection identifier is its 1-based element number.
    assert_eq!(
        outcome,
        SessionOutcome::Selected {
            x: 210,
            y: 6,
            label: "3".to_string(),
        }
    );
    // Nudge-then-land pointer motion.
    assert_eq!(platform.moves, vec![(211, 7), (210, 6)]);
    assert_eq!(platform.grabs, 1);
    assert_eq!(platform.ungrabs, 1);
}

#[test]
fn first_keystroke_narrows_before_the_second_lands() {
    let mut platform = MockPlatform::with_keys(&[Key::Char('0'), Key::Escape]);
    let config = Config::default();
    let names: Vec<String> = (0..10).map(|i| format!("item {i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let outcome = run_session(&mut platform, &config, StaticStrategy::named(&name_refs));

    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(platform.draws.len(), 2);
    assert_eq!(platform.draws[0].len(), 10);
    // "0" keeps "01".."09" and drops "10".
    assert_eq!(platform.draws[1].len(), 9);
}

#[test]
fn letters_are_noops_when_the_detector_has_no_names() {
    let mut platform = MockPlatform::with_keys(&[Key::Char('a'), Key::Char('2')]);
    let config = Config::default();

    let outcome = run_session(&mut platform, &config, StaticStrategy::nameless(3));

    assert_eq!(
        outcome,
        SessionOutcome::Selected {
            x: 110,
            y: 6,
            label: "2".to_string(),
        }
    );
    // The letter produced no filter pass and no redraw; only the initial
    // draw and the digit's redraw happened.
    assert_eq!(platform.draws.len(), 2);
}

#[test]
fn escape_cancels_and_cleanup_always_runs() {
    let mut platform = MockPlatform::with_keys(&[Key::Escape]);
    let config = Config::default();

    let outcome = run_session(&mut platform, &config, StaticStrategy::named(&["ok", "no"]));

    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert!(platform.moves.is_empty());
    assert_eq!(platform.grabs, 1);
    assert_eq!(platform.ungrabs, 1);
    assert!(platform.clears >= 2);
}

#[test]
fn detection_failure_surfaces_a_message_and_fails() {
    let mut platform = MockPlatform::with_keys(&[]);
    let config = Config::default();

    let outcome = run_session(&mut platform, &config, StaticStrategy::failing());

    let SessionOutcome::Failed { message } = outcome else {
        panic!("expected the session to fail");
    };
    assert!(message.contains("all detection strategies failed"));
    assert_eq!(platform.draws.len(), 1);
    assert_eq!(platform.draws[0][0].label, "No elements found");
    assert_eq!(platform.grabs, 0);
}

#[test]
fn alphabetic_mode_reports_the_typed_label() {
    let mut platform = MockPlatform::with_keys(&[Key::Char('b')]);
    let mut config = Config::default();
    config.hints.mode = HintMode::Alphabetic;

    let outcome = run_session(
        &mut platform,
        &config,
        StaticStrategy::named(&["one", "two", "three"]),
    );

    // Labels are "A", "B", "C"; the prefix match is case-insensitive and
    // the reported identifier is the literal typed buffer.
    assert_eq!(
        outcome,
        SessionOutcome::Selected {
            x: 110,
            y: 6,
            label: "b".to_string(),
        }
    );
}

#[test]
fn letter_narrowing_to_one_match_waits_for_select() {
    let mut platform = MockPlatform::with_keys(&[Key::Char('s'), Key::Enter]);
    let config = Config::default();

    let outcome = run_session(
        &mut platform,
        &config,
        StaticStrategy::named(&["save", "quit"]),
    );

    // "s" narrows to the single hint "save", but a letter keystroke in
    // numeric mode never auto-selects; Enter confirms the highlight.
    assert_eq!(
        outcome,
        SessionOutcome::Selected {
            x: 10,
            y: 6,
            label: "1".to_string(),
        }
    );
}

#[test]
fn rejected_keystroke_changes_nothing_on_screen() {
    let mut platform = MockPlatform::with_keys(&[Key::Char('e'), Key::Char('z'), Key::Escape]);
    let config = Config::default();

    let outcome = run_session(
        &mut platform,
        &config,
        StaticStrategy::named(&["ok", "cancel", "help"]),
    );

    assert_eq!(outcome, SessionOutcome::Cancelled);
    // Initial draw plus the "e" redraw; the impossible "ez" filter was
    // rolled back without another frame.
    assert_eq!(platform.draws.len(), 2);
}

#[test]
fn undo_all_restores_the_full_candidate_set() {
    let mut platform = MockPlatform::with_keys(&[Key::Char('0'), Key::CtrlU, Key::Escape]);
    let config = Config::default();
    let names: Vec<String> = (0..10).map(|i| format!("item {i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let outcome = run_session(&mut platform, &config, StaticStrategy::named(&name_refs));

    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(platform.draws.len(), 3);
    assert_eq!(platform.draws[2].len(), 10);
}

#[test]
fn screen_offset_round_trips_between_spaces() {
    let mut platform = MockPlatform::with_keys(&[Key::Char('1')]);
    platform.offset = (1920, 0);
    let config = Config::default();

    let strategy = StaticStrategy {
        elements: vec![UiElement {
            x: 2000,
            y: 100,
            w: 40,
            h: 40,
            name: Some("ok".to_string()),
            role: None,
        }],
        names_available: true,
        fail: false,
    };
    let outcome = run_session(&mut platform, &config, strategy);

    // Hint space is screen-relative (x = 80); the reported coordinates
    // are absolute again.
    assert_eq!(
        outcome,
        SessionOutcome::Selected {
            x: 2010,
            y: 106,
            label: "1".to_string(),
        }
    );
    assert_eq!(platform.moves, vec![(91, 107), (90, 106)]);
}

#[test]
fn undo_refilters_from_the_shorter_buffer() {
    let mut platform =
        MockPlatform::with_keys(&[Key::Char('e'), Key::Char('l'), Key::Backspace, Key::Escape]);
    let config = Config::default();

    let outcome = run_session(
        &mut platform,
        &config,
        StaticStrategy::named(&["ok", "cancel", "help"]),
    );

    assert_eq!(outcome, SessionOutcome::Cancelled);
    // Initial frame, "e", "el", then the backspace back to "e"; both
    // text filters keep the same two matches alive.
    assert_eq!(platform.draws.len(), 4);
    assert_eq!(platform.draws[3].len(), 2);
}
