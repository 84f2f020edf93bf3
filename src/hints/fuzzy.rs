use super::normalize::normalize;

/// In-order, case-insensitive subsequence match of `pattern` inside
/// `text`, after both are diacritic-normalized. `None` means some
/// pattern character never occurs (in order); otherwise the score ranks
/// the match — lower is better, favoring matches that start early and
/// stay contiguous.
///
/// score = start * 100 + span + (50 unless the match is contiguous)
///
/// The scan is a single forward pass: each pattern character consumes
/// text from where the previous one matched, with no backtracking, so an
/// earlier greedy match is never revisited even when a later start would
/// score better.
pub fn fuzzy_match_score(text: &str, pattern: &str) -> Option<i32> {
    if pattern.is_empty() {
        return Some(0);
    }

    let text = normalize(text);
    let pattern = normalize(pattern);

    let mut positions = text.char_indices();
    let mut start_pos: Option<i32> = None;
    let mut prev_pos = 0i32;
    let mut last_pos = 0i32;
    let mut contiguous = true;

    for pc in pattern.chars() {
        let pc = pc.to_ascii_lowercase();
        let mut found = false;

        for (pos, tc) in positions.by_ref() {
            if tc.to_ascii_lowercase() != pc {
                continue;
            }
            let pos = pos as i32;
            match start_pos {
                None => start_pos = Some(pos),
                Some(_) if pos != prev_pos + 1 => contiguous = false,
                Some(_) => {}
            }
            prev_pos = pos;
            last_pos = pos;
            found = true;
            break;
        }

        if !found {
            return None;
        }
    }

    let start = start_pos?;
    let span = last_pos - start;
    Some(start * 100 + span + if contiguous { 0 } else { 50 })
}

/// Boolean form for callers that only need membership.
pub fn fuzzy_matches(text: &str, pattern: &str) -> bool {
    fuzzy_match_score(text, pattern).is_some()
}
