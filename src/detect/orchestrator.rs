use tracing::{debug, info, warn};

use super::dedup::{DedupParams, remove_overlapping};
use super::element::{DetectionResult, UiElement};
use super::strategy::DetectorStrategy;

/// Runs the fallback chain: first strategy that is available, succeeds,
/// and clears its own minimum-element threshold wins, and its elements
/// are deduplicated before being returned. Always produces a usable
/// `DetectionResult`; when every strategy is exhausted the failure is
/// synthesized here.
///
/// `context` names the caller (platform or session) in the logs.
pub fn run(
    mut strategies: Vec<Box<dyn DetectorStrategy>>,
    context: &'static str,
    params: &DedupParams,
) -> DetectionResult {
    if strategies.is_empty() {
        return DetectionResult::failed(-1, format!("{context}: no detection strategies available"));
    }

    for strategy in &mut strategies {
        let name = strategy.name();

        if !strategy.is_available() {
            debug!(context, strategy = name, "strategy not available");
            continue;
        }

        debug!(context, strategy = name, "trying detection");
        let detected = match strategy.detect() {
            DetectionResult::Detected(detected) => detected,
            DetectionResult::Failed(error) => {
                warn!(
                    context,
                    strategy = name,
                    code = error.code,
                    message = %error.message,
                    "detection failed, trying next strategy"
                );
                continue;
            }
        };

        let found = detected.elements.len();
        let usable: Vec<UiElement> = detected
            .elements
            .into_iter()
            .filter(UiElement::is_usable)
            .collect();
        if usable.len() < found {
            debug!(
                context,
                strategy = name,
                dropped = found - usable.len(),
                "dropped zero-sized elements"
            );
        }

        if usable.is_empty() {
            warn!(
                context,
                strategy = name,
                "no usable elements, trying next strategy"
            );
            continue;
        }

        let min = strategy.min_elements();
        if min > 0 && usable.len() < min {
            info!(
                context,
                strategy = name,
                found = usable.len(),
                min,
                "below minimum element threshold, trying next strategy"
            );
            continue;
        }

        let deduped = remove_overlapping(usable, params);
        info!(
            context,
            strategy = name,
            elements = deduped.len(),
            "detection succeeded"
        );
        return DetectionResult::detected(deduped, name, detected.names_available);
    }

    warn!(context, "all detection strategies failed");
    DetectionResult::failed(-1, format!("{context}: all detection strategies failed"))
}
