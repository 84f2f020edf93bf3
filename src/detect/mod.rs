mod dedup;
mod element;
pub mod orchestrator;
mod strategy;
mod task;

pub use dedup::{DedupParams, remove_overlapping};
pub use element::{DetectedElements, DetectionError, DetectionResult, UiElement};
pub use strategy::{DetectorStrategy, default_strategies};
pub use task::DetectorTask;
