use std::thread;
use std::time::Duration;

use tracing::warn;

use super::dedup::DedupParams;
use super::element::DetectionResult;
use super::orchestrator;
use super::strategy::DetectorStrategy;

/// One detection run on a dedicated worker thread.
///
/// The UI thread polls `is_done` at its render cadence (to keep a busy
/// cursor animating) and collects the result with `join`. The result
/// crosses the thread boundary through a one-shot channel written exactly
/// once by the worker; no other state is shared.
///
/// At most one task may be outstanding per session — the platform
/// detectors are not reentrant.
pub struct DetectorTask {
    result_rx: flume::Receiver<DetectionResult>,
    worker: Option<thread::JoinHandle<()>>,
}

impl DetectorTask {
    pub fn spawn(
        strategies: Vec<Box<dyn DetectorStrategy>>,
        context: &'static str,
        params: DedupParams,
    ) -> Self {
        let (result_tx, result_rx) = flume::bounded(1);
        let worker = thread::Builder::new()
            .name("hintpoint-detect".to_string())
            .spawn(move || {
                let result = orchestrator::run(strategies, context, &params);
                let _ = result_tx.send(result);
            })
            .expect("detector worker thread should spawn");

        Self {
            result_rx,
            worker: Some(worker),
        }
    }

    /// Non-blocking completion probe.
    pub fn is_done(&self) -> bool {
        !self.result_rx.is_empty() || self.result_rx.is_disconnected()
    }

    /// Blocks until the worker finishes and returns its result. A worker
    /// that died without reporting yields a synthesized failure.
    pub fn join(mut self) -> DetectionResult {
        let result = match self.result_rx.recv() {
            Ok(result) => result,
            Err(_) => DetectionResult::failed(-1, "detection worker exited without a result"),
        };
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        result
    }

    /// Like `join`, but gives up after `deadline`. Detection has no
    /// cooperative cancellation, so on timeout the worker is left to run
    /// to completion detached and its eventual result is dropped.
    pub fn join_deadline(mut self, deadline: Duration) -> DetectionResult {
        match self.result_rx.recv_timeout(deadline) {
            Ok(result) => {
                if let Some(worker) = self.worker.take() {
                    let _ = worker.join();
                }
                result
            }
            Err(flume::RecvTimeoutError::Timeout) => {
                warn!(?deadline, "detection timed out, abandoning worker");
                self.worker.take();
                DetectionResult::failed(-1, "detection timed out")
            }
            Err(flume::RecvTimeoutError::Disconnected) => {
                if let Some(worker) = self.worker.take() {
                    let _ = worker.join();
                }
                DetectionResult::failed(-1, "detection worker exited without a result")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::detect::dedup::DedupParams;
    use crate::detect::element::{DetectionResult, UiElement};
    use crate::detect::strategy::DetectorStrategy;

    use super::DetectorTask;

    const PARAMS: DedupParams = DedupParams {
        distance_px: 10,
        area_ratio: 0.7,
        hint_w: 20,
        hint_h: 20,
    };

    struct FixedStrategy {
        elements: Vec<UiElement>,
        delay: Duration,
    }

    impl DetectorStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn detect(&mut self) -> DetectionResult {
            std::thread::sleep(self.delay);
            DetectionResult::detected(self.elements.clone(), "fixed", true)
        }
    }

    fn element(x: i32, y: i32) -> UiElement {
        UiElement {
            x,
            y,
            w: 40,
            h: 40,
            name: Some("button".to_string()),
            role: None,
        }
    }

    #[test]
    fn join_returns_worker_result() {
        let task = DetectorTask::spawn(
            vec![Box::new(FixedStrategy {
                elements: vec![element(0, 0), element(200, 0)],
                delay: Duration::ZERO,
            })],
            "test",
            PARAMS,
        );
        let result = task.join();
        assert_eq!(result.element_count(), 2);
    }

    #[test]
    fn is_done_flips_after_completion() {
        let task = DetectorTask::spawn(
            vec![Box::new(FixedStrategy {
                elements: vec![element(0, 0)],
                delay: Duration::from_millis(30),
            })],
            "test",
            PARAMS,
        );

        let mut waited = Duration::ZERO;
        while !task.is_done() && waited < Duration::from_secs(5) {
            std::thread::sleep(Duration::from_millis(5));
            waited += Duration::from_millis(5);
        }
        assert!(task.is_done());
        assert!(task.join().is_detected());
    }

    #[test]
    fn join_deadline_gives_up_on_slow_detection() {
        let task = DetectorTask::spawn(
            vec![Box::new(FixedStrategy {
                elements: vec![element(0, 0)],
                delay: Duration::from_secs(2),
            })],
            "test",
            PARAMS,
        );
        let result = task.join_deadline(Duration::from_millis(20));
        assert!(!result.is_detected());
    }

    #[test]
    fn empty_chain_reports_failure() {
        let task = DetectorTask::spawn(Vec::new(), "test", PARAMS);
        let result = task.join();
        assert!(!result.is_detected());
    }
}
