use crate::crop::{catalog, Crop};
use crate::image_classifier::interface::{Accelerator, ResizeMethod};
use chrono::{Offset, Utc};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierEngine {
    Fake,
    Tract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSource {
    Fake,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Console,
    Gui,
}

impl FromStr for ClassifierEngine {
    type Err = Box<dyn std::error::Error + Send + Sync>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fake" => Ok(ClassifierEngine::Fake),
            "tract" => Ok(ClassifierEngine::Tract),
            other => Err(format!("unknown classifier engine: {}", other).into()),
        }
    }
}

impl FromStr for CameraSource {
    type Err = Box<dyn std::error::Error + Send + Sync>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fake" => Ok(CameraSource::Fake),
            "directory" | "dir" => Ok(CameraSource::Directory),
            other => Err(format!("unknown camera source: {}", other).into()),
        }
    }
}

impl FromStr for DisplayKind {
    type Err = Box<dyn std::error::Error + Send + Sync>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(DisplayKind::Console),
            "gui" => Ok(DisplayKind::Gui),
            other => Err(format!("unknown display: {}", other).into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub crops: Vec<Crop>,
    pub models_dir: PathBuf,
    pub classifier_engine: ClassifierEngine,
    pub classifier_input_size: (u32, u32),
    pub classifier_resize: ResizeMethod,
    pub classifier_accelerator: Accelerator,
    pub classifier_cpu_fallback: bool,
    pub classifier_max_results: usize,
    pub camera_source: CameraSource,
    pub camera_frames_dir: PathBuf,
    pub camera_frame_interval: Duration,
    pub display: DisplayKind,
    pub rewarded_ad_unit_id: String,
    pub banner_ad_unit_id: String,
    pub ad_load_latency: Duration,
    pub ad_fill_rate: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: india_standard_time(),
            crops: catalog(),
            models_dir: PathBuf::from("models"),
            classifier_engine: ClassifierEngine::Fake,
            classifier_input_size: (224, 224),
            classifier_resize: ResizeMethod::Bilinear,
            classifier_accelerator: Accelerator::Gpu,
            classifier_cpu_fallback: true,
            classifier_max_results: 3,
            camera_source: CameraSource::Fake,
            camera_frames_dir: PathBuf::from("frames"),
            camera_frame_interval: Duration::from_millis(100),
            display: DisplayKind::Console,
            rewarded_ad_unit_id: "ca-app-pub-3940256099942544/5224354917".to_string(),
            banner_ad_unit_id: "ca-app-pub-3940256099942544/6300978111".to_string(),
            ad_load_latency: Duration::from_millis(500),
            ad_fill_rate: 0.9,
        }
    }
}

impl Config {
    /// Defaults overridden by `CROP_DOCTOR_*` environment variables.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error + Send + Sync>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("CROP_DOCTOR_ENGINE") {
            config.classifier_engine = value.parse()?;
        }
        if let Some(value) = lookup("CROP_DOCTOR_MODELS_DIR") {
            config.models_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("CROP_DOCTOR_CAMERA") {
            config.camera_source = value.parse()?;
        }
        if let Some(value) = lookup("CROP_DOCTOR_FRAMES_DIR") {
            config.camera_frames_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("CROP_DOCTOR_FRAME_INTERVAL_MS") {
            config.camera_frame_interval = Duration::from_millis(value.trim().parse()?);
        }
        if let Some(value) = lookup("CROP_DOCTOR_DISPLAY") {
            config.display = value.parse()?;
        }
        if let Some(value) = lookup("CROP_DOCTOR_CPU_ONLY") {
            if matches!(value.trim(), "1" | "true") {
                config.classifier_accelerator = Accelerator::Cpu;
            }
        }

        Ok(config)
    }
}

fn india_standard_time() -> chrono::FixedOffset {
    chrono::FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.classifier_input_size, (224, 224));
        assert_eq!(config.classifier_resize, ResizeMethod::Bilinear);
        assert_eq!(config.classifier_accelerator, Accelerator::Gpu);
        assert_eq!(config.classifier_max_results, 3);
        assert_eq!(config.crops.len(), 6);
        assert_eq!(config.logger_timezone.local_minus_utc(), 19_800);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("CROP_DOCTOR_ENGINE", "Tract"),
            ("CROP_DOCTOR_MODELS_DIR", "/opt/models"),
            ("CROP_DOCTOR_CAMERA", "dir"),
            ("CROP_DOCTOR_FRAME_INTERVAL_MS", "250"),
            ("CROP_DOCTOR_DISPLAY", "gui"),
            ("CROP_DOCTOR_CPU_ONLY", "true"),
        ]))
        .unwrap();

        assert_eq!(config.classifier_engine, ClassifierEngine::Tract);
        assert_eq!(config.models_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.camera_source, CameraSource::Directory);
        assert_eq!(config.camera_frame_interval, Duration::from_millis(250));
        assert_eq!(config.display, DisplayKind::Gui);
        assert_eq!(config.classifier_accelerator, Accelerator::Cpu);
    }

    #[test]
    fn test_invalid_env_value_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("CROP_DOCTOR_ENGINE", "onnxruntime")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CROP_DOCTOR_FRAME_INTERVAL_MS", "soon")])).is_err());
    }
}
