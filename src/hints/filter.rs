use tracing::debug;

use super::fuzzy::{fuzzy_match_score, fuzzy_matches};
use super::label::assign_numeric;
use super::state::{Hint, HintMode, SelectionState};

/// Result of one filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Match set rebuilt from the current filters.
    Applied,
    /// The filters would have matched nothing; they were rolled back to
    /// the last applied set and the match set is untouched.
    Rejected,
    /// Matches were re-sorted by text-match quality and re-labeled; the
    /// old labels no longer mean anything.
    Regenerated,
}

fn label_has_prefix(label: &str, prefix: &str, case_sensitive: bool) -> bool {
    if prefix.is_empty() {
        return true;
    }
    if case_sensitive {
        return label.starts_with(prefix);
    }
    label.len() >= prefix.len()
        && label.is_char_boundary(prefix.len())
        && label[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn hint_matches(hint: &Hint, state: &SelectionState) -> bool {
    match state.mode {
        HintMode::Numeric => {
            if !label_has_prefix(&hint.label, &state.num_filter, true) {
                return false;
            }
            if state.text_filter.is_empty() || !state.names_available {
                return true;
            }
            hint.element_name
                .as_deref()
                .is_some_and(|name| fuzzy_matches(name, &state.text_filter))
        }
        HintMode::Alphabetic => label_has_prefix(&hint.label, &state.num_filter, false),
    }
}

/// Recomputes the match set from the current filter buffers.
///
/// The source array is the original hints until labels have been
/// regenerated, after which it is the previous match set. The new set is
/// always rebuilt from scratch; a pass that would leave it empty is
/// rejected and the filters roll back to the last applied ones.
///
/// In numeric mode, once a text filter is active with no digit prefix,
/// matches are ranked by fuzzy score (ties broken by distance from the
/// screen center) and re-labeled in that order, so the best candidates
/// get the shortest reachable numbers. Typing digits first keeps the
/// original numbering untouched.
pub fn apply(state: &mut SelectionState) -> FilterOutcome {
    let is_numeric = state.mode == HintMode::Numeric;

    let source: Vec<Hint> = if state.labels_regenerated {
        state.matched.clone()
    } else {
        state.hints.clone()
    };

    let mut fresh: Vec<(Hint, i32)> = Vec::with_capacity(source.len());
    for hint in source {
        if !hint_matches(&hint, state) {
            continue;
        }
        let score = if is_numeric && !state.text_filter.is_empty() {
            hint.element_name
                .as_deref()
                .and_then(|name| fuzzy_match_score(name, &state.text_filter))
                .unwrap_or(0)
        } else {
            0
        };
        let mut hint = hint;
        hint.highlighted = false;
        fresh.push((hint, score));
    }

    if fresh.is_empty() && !state.matched.is_empty() {
        debug!(
            num_filter = %state.num_filter,
            text_filter = %state.text_filter,
            "filter would match nothing, rolling back"
        );
        let snapshot = state.last_applied.clone();
        state.restore(&snapshot);
        return FilterOutcome::Rejected;
    }

    let mut outcome = FilterOutcome::Applied;
    if is_numeric
        && !fresh.is_empty()
        && !state.text_filter.is_empty()
        && state.num_filter.is_empty()
    {
        let (cx, cy) = state.screen_center;
        fresh.sort_by_key(|(hint, score)| {
            let dx = i64::from(hint.x - cx);
            let dy = i64::from(hint.y - cy);
            (*score, dx * dx + dy * dy)
        });

        state.matched = fresh.into_iter().map(|(hint, _)| hint).collect();
        assign_numeric(&mut state.matched);
        state.labels_regenerated = true;
        outcome = FilterOutcome::Regenerated;
        debug!(
            matches = state.matched.len(),
            "sorted by text-match rank and re-labeled"
        );
    } else {
        state.matched = fresh.into_iter().map(|(hint, _)| hint).collect();
    }

    state.highlighted_index = 0;
    if let Some(first) = state.matched.first_mut() {
        first.highlighted = true;
    }

    state.last_applied = state.snapshot();
    outcome
}
