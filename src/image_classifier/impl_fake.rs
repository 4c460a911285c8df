use crate::image_classifier::categories::top_categories;
use crate::image_classifier::interface::{
    Classification, ClassifierOptions, ImageClassifier, ImageClassifierLoader,
};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const APPLE_LABELS: &[&str] = &[
    "Apple black rot",
    "Apple scab",
    "Apple cedar rust",
    "Apple healthy",
];
const TOMATO_LABELS: &[&str] = &[
    "Tomato late blight",
    "Tomato early blight",
    "Tomato leaf mold",
    "Tomato healthy",
];
const POTATO_LABELS: &[&str] = &["Potato late blight", "Potato early blight", "Potato healthy"];
const MANGO_LABELS: &[&str] = &[
    "Mango anthracnose",
    "Mango powdery mildew",
    "Mango sooty mould",
    "Mango healthy",
];
const GUAVA_LABELS: &[&str] = &["Guava canker", "Guava rust", "Guava healthy"];
const COTTON_LABELS: &[&str] = &[
    "Cotton bacterial blight",
    "Cotton curl virus",
    "Cotton healthy",
];

/// Label sets of the bundled crop models. The first label is matched by brown lesions, the
/// second by pale or yellow patches and the last one by healthy green tissue.
fn labels_for_model(model_name: &str) -> Option<&'static [&'static str]> {
    match model_name {
        "Apple_model_unquant.tflite" => Some(APPLE_LABELS),
        "Tomato_model_unquant.tflite" => Some(TOMATO_LABELS),
        "Potato_model_unquant.tflite" => Some(POTATO_LABELS),
        "Mango_model_unquant.tflite" => Some(MANGO_LABELS),
        "Guava_model_unquant.tflite" => Some(GUAVA_LABELS),
        "Cotton_model_unquant.tflite" => Some(COTTON_LABELS),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LeafFeatures {
    green: f32,
    brown: f32,
    pale: f32,
    other: f32,
}

fn leaf_features(image: &DynamicImage) -> LeafFeatures {
    let rgb = image.to_rgb8();
    let total = (rgb.width() * rgb.height()).max(1) as f32;
    let mut counts = [0u32; 4];

    for pixel in rgb.pixels() {
        let [r, g, b] = pixel.0;
        let bucket = if g > r && g > b {
            0
        } else if r > 180 && g > 180 {
            2
        } else if r >= g && r > b {
            1
        } else {
            3
        };
        counts[bucket] += 1;
    }

    LeafFeatures {
        green: counts[0] as f32 / total,
        brown: counts[1] as f32 / total,
        pale: counts[2] as f32 / total,
        other: counts[3] as f32 / total,
    }
}

fn scores_for(features: LeafFeatures, label_count: usize) -> Vec<f32> {
    const FLOOR: f32 = 0.01;
    if label_count < 2 {
        return vec![1.0; label_count];
    }
    let mut scores = vec![FLOOR; label_count];

    let middle = label_count.saturating_sub(3);
    scores[0] += features.brown;
    scores[label_count - 1] += features.green;
    if label_count >= 3 {
        scores[1] += features.pale;
    }
    for score in scores.iter_mut().skip(2).take(middle) {
        *score += features.other / middle as f32;
    }

    let sum: f32 = scores.iter().sum();
    scores.into_iter().map(|s| s / sum).collect()
}

/// Builds colour-statistics classifiers for the bundled crop models and counts how many
/// handles are alive at once.
pub struct ImageClassifierLoaderFake {
    logger: Arc<dyn Logger + Send + Sync>,
    live_handles: Arc<AtomicUsize>,
    peak_handles: Arc<AtomicUsize>,
    load_delay: Duration,
}

impl ImageClassifierLoaderFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            live_handles: Arc::new(AtomicUsize::new(0)),
            peak_handles: Arc::new(AtomicUsize::new(0)),
            load_delay: Duration::ZERO,
        }
    }

    #[cfg(test)]
    pub fn with_load_delay(mut self, load_delay: Duration) -> Self {
        self.load_delay = load_delay;
        self
    }

    #[cfg(test)]
    pub fn live_handles(&self) -> usize {
        self.live_handles.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn peak_handles(&self) -> usize {
        self.peak_handles.load(Ordering::SeqCst)
    }
}

impl ImageClassifierLoader for ImageClassifierLoaderFake {
    fn load(
        &self,
        options: &ClassifierOptions,
    ) -> Result<Box<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
        let labels = labels_for_model(&options.model_name)
            .ok_or_else(|| format!("model file not found: {}", options.model_path.display()))?;

        std::thread::sleep(self.load_delay);

        let live = self.live_handles.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_handles.fetch_max(live, Ordering::SeqCst);

        let _ = self.logger.info(&format!(
            "Loaded {} ({} live handles)",
            options.model_name, live
        ));

        Ok(Box::new(ImageClassifierFake {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            max_results: options.max_results,
            live_handles: self.live_handles.clone(),
        }))
    }
}

pub struct ImageClassifierFake {
    labels: Vec<String>,
    max_results: usize,
    live_handles: Arc<AtomicUsize>,
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let scores = scores_for(leaf_features(image), self.labels.len());
        Ok(top_categories(&scores, &self.labels, self.max_results))
    }
}

impl Drop for ImageClassifierFake {
    fn drop(&mut self) {
        self.live_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_classifier::interface::{Accelerator, ResizeMethod};
    use crate::library::logger::impl_memory::LoggerMemory;
    use image::{ImageBuffer, Rgb};
    use std::path::PathBuf;

    fn options(model_name: &str) -> ClassifierOptions {
        ClassifierOptions {
            model_name: model_name.to_string(),
            model_path: PathBuf::from("models").join(model_name),
            input_size: (224, 224),
            resize: ResizeMethod::Bilinear,
            accelerator: Accelerator::Gpu,
            cpu_fallback: true,
            max_results: 3,
        }
    }

    fn leaf(healthy: Rgb<u8>, lesion: Rgb<u8>, lesion_rows: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(224, 224, |_, y| {
            if y < lesion_rows {
                lesion
            } else {
                healthy
            }
        }))
    }

    #[test]
    fn test_blighted_tomato_ranks_blight_first() {
        let loader = ImageClassifierLoaderFake::new(Arc::new(LoggerMemory::new()));
        let classifier = loader.load(&options("Tomato_model_unquant.tflite")).unwrap();

        let result = classifier
            .classify(&leaf(Rgb([40, 160, 50]), Rgb([110, 70, 30]), 160))
            .unwrap();

        assert_eq!(result.len(), 3);
        assert!(result[0].label.contains("blight"));
        assert!(result
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence));
    }

    #[test]
    fn test_green_leaf_is_healthy() {
        let loader = ImageClassifierLoaderFake::new(Arc::new(LoggerMemory::new()));
        let classifier = loader.load(&options("Potato_model_unquant.tflite")).unwrap();

        let result = classifier
            .classify(&leaf(Rgb([40, 160, 50]), Rgb([110, 70, 30]), 10))
            .unwrap();

        assert_eq!(result[0].label, "Potato healthy");
        assert!(result.iter().all(|c| (0.0..=1.0).contains(&c.confidence)));
    }

    #[test]
    fn test_unknown_model_fails_to_load() {
        let loader = ImageClassifierLoaderFake::new(Arc::new(LoggerMemory::new()));

        assert!(loader.load(&options("Banana_model_unquant.tflite")).is_err());
        assert_eq!(loader.live_handles(), 0);
    }

    #[test]
    fn test_dropping_handle_releases_it() {
        let loader = ImageClassifierLoaderFake::new(Arc::new(LoggerMemory::new()));

        let first = loader.load(&options("Apple_model_unquant.tflite")).unwrap();
        let second = loader.load(&options("Mango_model_unquant.tflite")).unwrap();
        assert_eq!(loader.live_handles(), 2);

        drop(first);
        drop(second);
        assert_eq!(loader.live_handles(), 0);
        assert_eq!(loader.peak_handles(), 2);
    }

    #[test]
    fn test_scores_sum_to_one() {
        let features = LeafFeatures {
            green: 0.5,
            brown: 0.2,
            pale: 0.2,
            other: 0.1,
        };

        let scores = scores_for(features, 4);

        assert!((scores.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(scores[3] > scores[0]);
    }
}
