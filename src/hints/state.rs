use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Hard cap on hints per session; detectors normally stay far below it.
pub const MAX_HINTS: usize = 2048;

/// Filter buffers stop growing past these lengths, matching the original
/// fixed-size input buffers.
pub const MAX_NUM_FILTER: usize = 31;
pub const MAX_TEXT_FILTER: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum HintMode {
    /// Zero-padded decimal labels with fuzzy text filtering.
    #[serde(rename = "numeric")]
    Numeric,
    /// Classic letter labels, prefix-matched case-insensitively.
    #[serde(rename = "alphabet")]
    Alphabetic,
}

/// One selectable overlay box, in screen-relative coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub label: String,
    /// Position in the pre-filter hint array; stable across relabeling,
    /// this is what identifies the underlying element to the caller.
    pub original_index: usize,
    /// Element name (or role when the name is absent); only consulted by
    /// the fuzzy text filter.
    pub element_name: Option<String>,
    pub highlighted: bool,
}

impl Hint {
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct FilterSnapshot {
    pub(crate) num_filter: String,
    pub(crate) text_filter: String,
    pub(crate) labels_regenerated: bool,
}

/// All mutable state of one hint-selection session. Created when hints
/// go on screen, mutated on every keystroke, dropped when the session
/// ends. Nothing here outlives the session.
#[derive(Debug, Clone)]
pub struct SelectionState {
    pub(crate) hints: Vec<Hint>,
    pub(crate) matched: Vec<Hint>,
    pub(crate) num_filter: String,
    pub(crate) text_filter: String,
    pub(crate) highlighted_index: usize,
    pub(crate) mode: HintMode,
    /// False when the winning detector could not attach element names;
    /// text filtering is disabled entirely in that case.
    pub(crate) names_available: bool,
    /// Once matched hints have been re-sorted and re-labeled, filtering
    /// sources from the matched array instead of the original hints for
    /// the rest of the session.
    pub(crate) labels_regenerated: bool,
    /// Screen center in the hints' coordinate space, used to break fuzzy
    /// score ties by proximity.
    pub(crate) screen_center: (i32, i32),
    /// Last successfully applied filter set; rejected filter passes roll
    /// back to this.
    pub(crate) last_applied: FilterSnapshot,
}

impl SelectionState {
    pub fn new(
        hints: Vec<Hint>,
        mode: HintMode,
        names_available: bool,
        screen_center: (i32, i32),
    ) -> AppResult<Self> {
        if hints.is_empty() {
            return Err(AppError::NoElementsFound);
        }
        if hints.len() > MAX_HINTS {
            return Err(AppError::TooManyHints {
                count: hints.len(),
                max: MAX_HINTS,
            });
        }

        Ok(Self {
            hints,
            matched: Vec::new(),
            num_filter: String::new(),
            text_filter: String::new(),
            highlighted_index: 0,
            mode,
            names_available,
            labels_regenerated: false,
            screen_center,
            last_applied: FilterSnapshot::default(),
        })
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    pub fn matched(&self) -> &[Hint] {
        &self.matched
    }

    pub fn mode(&self) -> HintMode {
        self.mode
    }

    pub fn names_available(&self) -> bool {
        self.names_available
    }

    pub fn labels_regenerated(&self) -> bool {
        self.labels_regenerated
    }

    pub fn num_filter(&self) -> &str {
        &self.num_filter
    }

    pub fn text_filter(&self) -> &str {
        &self.text_filter
    }

    pub fn highlighted(&self) -> Option<&Hint> {
        self.matched.get(self.highlighted_index)
    }

    pub fn has_filters(&self) -> bool {
        !self.num_filter.is_empty() || !self.text_filter.is_empty()
    }

    /// Appends a character to the appropriate filter buffer. Returns
    /// false when the input cannot be accepted: a letter with no name
    /// data to match against, or a full buffer.
    pub fn append_filter(&mut self, c: char, is_letter: bool) -> bool {
        if is_letter {
            if !self.names_available {
                tracing::debug!(%c, "ignoring letter, detector supplied no element names");
                return false;
            }
            if self.text_filter.len() >= MAX_TEXT_FILTER {
                return false;
            }
            self.text_filter.push(c);
        } else {
            if self.num_filter.len() >= MAX_NUM_FILTER {
                return false;
            }
            self.num_filter.push(c);
        }
        true
    }

    /// Removes the last filter character, text filter first. Returns
    /// false when both buffers are already empty.
    pub fn undo_filter(&mut self) -> bool {
        if self.text_filter.pop().is_some() {
            return true;
        }
        self.num_filter.pop().is_some()
    }

    /// Clears both filter buffers. `labels_regenerated` survives: hints
    /// dropped before a relabel are gone for the rest of the session.
    pub fn clear_filters(&mut self) {
        self.num_filter.clear();
        self.text_filter.clear();
    }

    pub fn reset_num_filter(&mut self) {
        self.num_filter.clear();
    }

    pub(crate) fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            num_filter: self.num_filter.clone(),
            text_filter: self.text_filter.clone(),
            labels_regenerated: self.labels_regenerated,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: &FilterSnapshot) {
        self.num_filter = snapshot.num_filter.clone();
        self.text_filter = snapshot.text_filter.clone();
        self.labels_regenerated = snapshot.labels_regenerated;
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;

    use super::{Hint, HintMode, MAX_HINTS, SelectionState};

    fn hint(index: usize, label: &str) -> Hint {
        Hint {
            x: index as i32 * 50,
            y: 0,
            w: 20,
            h: 20,
            label: label.to_string(),
            original_index: index,
            element_name: None,
            highlighted: false,
        }
    }

    #[test]
    fn creation_rejects_empty_and_oversized_hint_sets() {
        let err = SelectionState::new(Vec::new(), HintMode::Numeric, true, (0, 0));
        assert!(matches!(err, Err(AppError::NoElementsFound)));

        let too_many = (0..MAX_HINTS + 1).map(|i| hint(i, "x")).collect();
        let err = SelectionState::new(too_many, HintMode::Numeric, true, (0, 0));
        assert!(matches!(err, Err(AppError::TooManyHints { .. })));
    }

    #[test]
    fn letters_are_refused_without_name_data() {
        let mut state =
            SelectionState::new(vec![hint(0, "1")], HintMode::Numeric, false, (0, 0))
                .expect("state should build");
        assert!(!state.append_filter('a', true));
        assert!(state.text_filter().is_empty());
        assert!(state.append_filter('1', false));
        assert_eq!(state.num_filter(), "1");
    }

    #[test]
    fn undo_takes_from_text_filter_first() {
        let mut state = SelectionState::new(vec![hint(0, "1")], HintMode::Numeric, true, (0, 0))
            .expect("state should build");
        state.append_filter('1', false);
        state.append_filter('a', true);
        state.append_filter('b', true);

        assert!(state.undo_filter());
        assert_eq!(state.text_filter(), "a");
        assert!(state.undo_filter());
        assert_eq!(state.text_filter(), "");
        assert!(state.undo_filter());
        assert_eq!(state.num_filter(), "");
        assert!(!state.undo_filter());
    }

    #[test]
    fn clear_filters_keeps_the_regenerated_flag() {
        let mut state = SelectionState::new(vec![hint(0, "1")], HintMode::Numeric, true, (0, 0))
            .expect("state should build");
        state.labels_regenerated = true;
        state.append_filter('1', false);
        state.clear_filters();
        assert!(!state.has_filters());
        assert!(state.labels_regenerated());
    }
}
