use serde::Serialize;

/// One interactive element reported by a detection backend, in
/// screen-absolute pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiElement {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl UiElement {
    /// Zero-sized elements cannot anchor a hint.
    pub fn is_usable(&self) -> bool {
        self.w > 0 && self.h > 0
    }

    pub fn area(&self) -> i64 {
        i64::from(self.w) * i64::from(self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionError {
    pub code: i32,
    pub message: String,
}

impl DetectionError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Elements produced by the strategy that won the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedElements {
    pub elements: Vec<UiElement>,
    /// Name of the strategy that produced the elements.
    pub source: &'static str,
    /// False when the detector cannot attach names (screenshot-analysis
    /// style backends); text filtering is disabled for such results.
    pub names_available: bool,
}

/// Outcome of one detection attempt. A success always carries at least
/// one element; a failure carries only the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DetectionResult {
    Detected(DetectedElements),
    Failed(DetectionError),
}

impl DetectionResult {
    /// Success constructor. An empty element list degrades to a failure
    /// so the two cases can never mix.
    pub fn detected(
        elements: Vec<UiElement>,
        source: &'static str,
        names_available: bool,
    ) -> Self {
        if elements.is_empty() {
            return Self::Failed(DetectionError::new(
                -2,
                format!("{source}: no interactive elements detected"),
            ));
        }
        Self::Detected(DetectedElements {
            elements,
            source,
            names_available,
        })
    }

    pub fn failed(code: i32, message: impl Into<String>) -> Self {
        Self::Failed(DetectionError::new(code, message))
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Self::Detected(_))
    }

    pub fn element_count(&self) -> usize {
        match self {
            Self::Detected(detected) => detected.elements.len(),
            Self::Failed(_) => 0,
        }
    }
}
