mod filter;
mod fuzzy;
pub mod label;
mod normalize;
mod state;

pub use filter::{FilterOutcome, apply as apply_filter};
pub use fuzzy::{fuzzy_match_score, fuzzy_matches};
pub use normalize::{fold_char, normalize};
pub use state::{
    Hint, HintMode, MAX_HINTS, MAX_NUM_FILTER, MAX_TEXT_FILTER, SelectionState,
};
