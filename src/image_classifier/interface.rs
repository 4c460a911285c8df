use image::imageops::FilterType;
use image::DynamicImage;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.label, self.confidence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMethod {
    Bilinear,
    NearestNeighbor,
}

impl ResizeMethod {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResizeMethod::Bilinear => FilterType::Triangle,
            ResizeMethod::NearestNeighbor => FilterType::Nearest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    Cpu,
    Gpu,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOptions {
    pub model_name: String,
    pub model_path: PathBuf,
    /// (width, height) the image is resized to before inference.
    pub input_size: (u32, u32),
    pub resize: ResizeMethod,
    pub accelerator: Accelerator,
    /// Run on the CPU when the preferred accelerator is missing instead of failing the load.
    pub cpu_fallback: bool,
    pub max_results: usize,
}

/// A loaded model. Dropping it releases the underlying resources.
pub trait ImageClassifier {
    /// Expects an image already resized to the options' input size. Returns at most
    /// `max_results` entries ordered by descending confidence.
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait ImageClassifierLoader {
    fn load(
        &self,
        options: &ClassifierOptions,
    ) -> Result<Box<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>;
}
