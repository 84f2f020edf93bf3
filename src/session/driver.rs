use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::detect::{DedupParams, DetectionResult, DetectorStrategy, DetectorTask, UiElement};
use crate::error::AppResult;
use crate::hints::{self, FilterOutcome, Hint, HintMode, SelectionState, label};
use crate::platform::{Platform, ScreenId};

use super::command::{HintCommand, map_key_event};
use super::render;

/// What one smart-hint activation produced. `Selected` coordinates are
/// absolute screen pixels; `label` is the identifier scripting callers
/// see (element number in numeric mode, the typed label otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    Selected { x: i32, y: i32, label: String },
    Cancelled,
    Failed { message: String },
}

enum LoopExit {
    Chosen(Hint),
    Cancelled,
}

/// One activation-to-selection-or-cancel run of the hint pipeline:
/// background detection with a busy cursor, hint conversion and
/// labeling, then the keystroke/filter/render loop.
pub struct SmartHintSession<'a> {
    config: &'a Config,
    platform: &'a mut dyn Platform,
}

impl<'a> SmartHintSession<'a> {
    pub fn new(config: &'a Config, platform: &'a mut dyn Platform) -> Self {
        Self { config, platform }
    }

    pub fn run(
        &mut self,
        strategies: Vec<Box<dyn DetectorStrategy>>,
    ) -> AppResult<SessionOutcome> {
        let (screen, pointer_x, pointer_y) = self.platform.mouse_position();
        let (screen_w, screen_h) = self.platform.screen_dimensions(screen);
        let (hint_w, hint_h) = hint_box_size(screen_w, screen_h, self.config.hints.size_permille);

        let params = DedupParams {
            distance_px: self.config.detection.overlap_distance_px,
            area_ratio: self.config.detection.overlap_area_ratio,
            hint_w,
            hint_h,
        };

        let detected =
            match self.detect_with_progress(strategies, screen, pointer_x, pointer_y, params) {
                DetectionResult::Detected(detected) => detected,
                DetectionResult::Failed(error) => {
                    warn!(code = error.code, message = %error.message, "detection failed");
                    render::show_message(self.platform, screen, "No elements found", hint_h);
                    return Ok(SessionOutcome::Failed {
                        message: error.message,
                    });
                }
            };

        let names_available = detected.names_available;
        let mut elements = detected.elements;
        if elements.len() > self.config.detection.max_elements {
            debug!(
                found = elements.len(),
                cap = self.config.detection.max_elements,
                "truncating detection result"
            );
            elements.truncate(self.config.detection.max_elements);
        }

        let mode = self.effective_mode(names_available);
        let mut hints = convert_to_hints(
            elements,
            self.platform.screen_offset(screen),
            hint_w,
            hint_h,
        );
        match mode {
            HintMode::Numeric => label::assign_numeric(&mut hints),
            HintMode::Alphabetic => label::assign_alphabetic(&mut hints),
        }

        let mut state =
            SelectionState::new(hints, mode, names_available, (screen_w / 2, screen_h / 2))?;
        hints::apply_filter(&mut state);
        render::draw_state(self.platform, screen, &state);

        info!(
            source = detected.source,
            hints = state.matched().len(),
            ?mode,
            "selection session started"
        );

        self.platform.input_grab_keyboard();
        self.platform.mouse_hide();
        let exit = self.interact(screen, &mut state);
        self.platform.input_ungrab_keyboard();
        self.platform.screen_clear(screen);
        self.platform.mouse_show();
        self.platform.commit();

        match exit {
            LoopExit::Chosen(hint) => Ok(self.complete_selection(screen, &state, &hint)),
            LoopExit::Cancelled => Ok(SessionOutcome::Cancelled),
        }
    }

    /// Runs the orchestrator on its worker while this thread keeps the
    /// busy cursor alive, up to the configured detection deadline.
    fn detect_with_progress(
        &mut self,
        strategies: Vec<Box<dyn DetectorStrategy>>,
        screen: ScreenId,
        pointer_x: i32,
        pointer_y: i32,
        params: DedupParams,
    ) -> DetectionResult {
        let task = DetectorTask::spawn(strategies, "smart-hint", params);
        let poll = Duration::from_millis(self.config.input.poll_interval_ms);
        let deadline = Instant::now() + Duration::from_millis(self.config.detection.timeout_ms);

        loop {
            if task.is_done() {
                return task.join();
            }
            if Instant::now() >= deadline {
                return task.join_deadline(Duration::ZERO);
            }
            self.platform.draw_loading_cursor(screen, pointer_x, pointer_y);
            self.platform.commit();
            std::thread::sleep(poll);
        }
    }

    fn interact(&mut self, screen: ScreenId, state: &mut SelectionState) -> LoopExit {
        loop {
            let Some(event) = self.platform.input_next_event(Duration::ZERO) else {
                continue;
            };
            let Some(command) = map_key_event(event, state) else {
                continue;
            };

            match command {
                HintCommand::Exit => return LoopExit::Cancelled,
                HintCommand::Select => {
                    if let Some(hint) = state.highlighted() {
                        return LoopExit::Chosen(hint.clone());
                    }
                }
                HintCommand::Undo => {
                    if state.undo_filter()
                        && let Some(hint) = self.refilter(screen, state, false)
                    {
                        return LoopExit::Chosen(hint);
                    }
                }
                HintCommand::UndoAll => {
                    state.clear_filters();
                    hints::apply_filter(state);
                    render::draw_state(self.platform, screen, state);
                }
                HintCommand::FilterChar { ch, is_letter } => {
                    if !state.append_filter(ch, is_letter) {
                        continue;
                    }
                    if let Some(hint) = self.refilter(screen, state, is_letter) {
                        return LoopExit::Chosen(hint);
                    }
                }
            }
        }
    }

    /// One filter pass plus redraw. Returns the hint to auto-select when
    /// the pass narrowed the matches down to exactly one — except in
    /// numeric mode right after a letter, where auto-select is
    /// suppressed so the user can keep refining the text match. (That
    /// suppression is long-standing observed behavior; it is kept as-is
    /// rather than rationalized.)
    fn refilter(
        &mut self,
        screen: ScreenId,
        state: &mut SelectionState,
        last_was_letter: bool,
    ) -> Option<Hint> {
        match hints::apply_filter(state) {
            FilterOutcome::Rejected => None,
            outcome => {
                if outcome == FilterOutcome::Regenerated {
                    // Fresh labels: any digits typed against the old
                    // numbering are meaningless now.
                    state.reset_num_filter();
                }
                render::draw_state(self.platform, screen, state);

                let suppress = state.mode() == HintMode::Numeric && last_was_letter;
                if state.matched().len() == 1 && !suppress {
                    return state.matched().first().cloned();
                }
                None
            }
        }
    }

    fn complete_selection(
        &mut self,
        screen: ScreenId,
        state: &SelectionState,
        hint: &Hint,
    ) -> SessionOutcome {
        let (center_x, center_y) = hint.center();

        // Land in two steps; some text-selection widgets ignore a jump
        // that arrives exactly on target.
        self.platform.mouse_move(screen, center_x + 1, center_y + 1);
        self.platform.mouse_move(screen, center_x, center_y);

        let label = match state.mode() {
            HintMode::Numeric => (hint.original_index + 1).to_string(),
            HintMode::Alphabetic => state.num_filter().to_string(),
        };

        let (offset_x, offset_y) = self.platform.screen_offset(screen);
        info!(x = center_x + offset_x, y = center_y + offset_y, %label, "hint selected");
        SessionOutcome::Selected {
            x: center_x + offset_x,
            y: center_y + offset_y,
            label,
        }
    }

    fn effective_mode(&self, names_available: bool) -> HintMode {
        if !names_available
            && let Some(visual_mode) = self.config.hints.visual_mode
        {
            return visual_mode;
        }
        self.config.hints.mode
    }
}

/// Hint boxes are sized off the orientation-normalized screen: width
/// from the long edge, height from the short one, in thousandths.
fn hint_box_size(screen_w: i32, screen_h: i32, size_permille: u32) -> (i32, i32) {
    let (long_edge, short_edge) = if screen_w < screen_h {
        (screen_h, screen_w)
    } else {
        (screen_w, screen_h)
    };
    let w = long_edge * size_permille as i32 / 1000;
    let h = short_edge * size_permille as i32 / 1000;
    (w.max(1), h.max(1))
}

fn convert_to_hints(
    elements: Vec<UiElement>,
    offset: (i32, i32),
    hint_w: i32,
    hint_h: i32,
) -> Vec<Hint> {
    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| Hint {
            x: element.x - offset.0,
            y: element.y - offset.1,
            w: hint_w,
            h: hint_h,
            label: String::new(),
            original_index: index,
            element_name: element.name.or(element.role),
            highlighted: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::hint_box_size;

    #[test]
    fn hint_box_uses_the_long_edge_for_width() {
        assert_eq!(hint_box_size(1920, 1080, 20), (38, 21));
        // Portrait screens normalize to the same box.
        assert_eq!(hint_box_size(1080, 1920, 20), (38, 21));
    }

    #[test]
    fn hint_box_never_collapses_to_zero() {
        assert_eq!(hint_box_size(10, 10, 1), (1, 1));
    }
}
