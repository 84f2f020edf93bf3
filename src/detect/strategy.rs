use super::element::DetectionResult;

/// One detection backend in the fallback chain.
///
/// Strategies are stateless from the orchestrator's point of view; any
/// platform handles they hold are their own business. Result ownership
/// transfers to the orchestrator on return, so cleanup of discarded
/// results is a plain drop.
pub trait DetectorStrategy: Send {
    fn name(&self) -> &'static str;

    /// Cheap probe run before `detect`. Unavailable strategies are
    /// skipped without being invoked.
    fn is_available(&self) -> bool;

    fn detect(&mut self) -> DetectionResult;

    /// A successful result with fewer elements than this is discarded
    /// and the next strategy gets its turn. Zero disables the check.
    fn min_elements(&self) -> usize {
        0
    }
}

/// Strategy registry for the current build. Platform backends register
/// here; a build without any yields an empty chain and the orchestrator
/// reports that no strategy is usable.
pub fn default_strategies() -> Vec<Box<dyn DetectorStrategy>> {
    Vec::new()
}
