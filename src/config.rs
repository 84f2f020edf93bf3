use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::hints::HintMode;

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub hints: HintConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum distance in pixels between two hint anchors before the
    /// smaller element is dropped.
    pub overlap_distance_px: i32,
    /// Maximum hint-box overlap ratio (0.0-1.0) before the smaller
    /// element is dropped.
    pub overlap_area_ratio: f64,
    pub max_depth: usize,
    pub max_elements: usize,
    pub timeout_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            overlap_distance_px: 10,
            overlap_area_ratio: 0.7,
            max_depth: 25,
            max_elements: 512,
            timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HintConfig {
    /// Hint box size in thousandths of the screen dimensions.
    pub size_permille: u32,
    pub mode: HintMode,
    /// Label mode used when the winning detector supplies no element
    /// names (text filtering is impossible there, so a different label
    /// style can be preferable).
    pub visual_mode: Option<HintMode>,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            size_permille: 20,
            mode: HintMode::Numeric,
            visual_mode: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    pub poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 16,
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.detection.overlap_distance_px = self.detection.overlap_distance_px.max(0);
        if !self.detection.overlap_area_ratio.is_finite()
            || !(0.0..=1.0).contains(&self.detection.overlap_area_ratio)
        {
            self.detection.overlap_area_ratio = DetectionConfig::default().overlap_area_ratio;
        }
        self.detection.max_depth = self.detection.max_depth.max(1);
        self.detection.max_elements = self.detection.max_elements.max(1);
        self.detection.timeout_ms = self.detection.timeout_ms.max(1);
        self.hints.size_permille = self.hints.size_permille.clamp(1, 1000);
        self.input.poll_interval_ms = self.input.poll_interval_ms.max(1);
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("HINTPOINT_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("hintpoint").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("hintpoint")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("hintpoint").join("config.toml"));
    }
    None
}
