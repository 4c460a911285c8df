use crate::image_classifier::categories::top_categories;
use crate::image_classifier::interface::{
    Accelerator, Classification, ClassifierOptions, ImageClassifier, ImageClassifierLoader,
};
use crate::image_classifier::tract::labels::load_labels;
use crate::image_classifier::tract::tensor::{image_to_tensor, Normalization, TensorLayout};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Onnx,
    Tflite,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("onnx") => Ok(ModelFormat::Onnx),
            Some(ext) if ext.eq_ignore_ascii_case("tflite") => Ok(ModelFormat::Tflite),
            _ => Err(format!("unsupported model format: {}", path.display()).into()),
        }
    }

    fn layout(self) -> TensorLayout {
        match self {
            ModelFormat::Onnx => TensorLayout::Nchw,
            ModelFormat::Tflite => TensorLayout::Nhwc,
        }
    }

    fn normalization(self) -> Normalization {
        match self {
            ModelFormat::Onnx => Normalization::ZeroToOne,
            ModelFormat::Tflite => Normalization::MinusOneToOne,
        }
    }
}

pub struct ImageClassifierLoaderTract {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierLoaderTract {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("tract"),
        }
    }
}

impl ImageClassifierLoader for ImageClassifierLoaderTract {
    fn load(
        &self,
        options: &ClassifierOptions,
    ) -> Result<Box<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
        let classifier = ImageClassifierTract::new(options, &self.logger)?;
        Ok(Box::new(classifier))
    }
}

pub struct ImageClassifierTract {
    model: TypedRunnableModel<TypedModel>,
    format: ModelFormat,
    labels: Vec<String>,
    max_results: usize,
}

impl ImageClassifierTract {
    pub fn new(
        options: &ClassifierOptions,
        logger: &Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let path = options.model_path.as_path();
        if !path.is_file() {
            return Err(format!("model file not found: {}", path.display()).into());
        }

        // tract has no GPU delegate.
        if options.accelerator == Accelerator::Gpu {
            if !options.cpu_fallback {
                return Err("GPU accelerator is not available".into());
            }
            let _ = logger.info("GPU accelerator not available, running on CPU");
        }

        let format = ModelFormat::from_path(path)?;
        let (width, height) = options.input_size;

        let model = match format {
            ModelFormat::Onnx => tract_onnx::onnx()
                .model_for_path(path)?
                .with_input_fact(0, f32::fact([1, 3, height as usize, width as usize]).into())?
                .into_optimized()?
                .into_runnable()?,
            ModelFormat::Tflite => load_tflite(path)?.into_optimized()?.into_runnable()?,
        };

        let labels = load_labels(path)?;
        if labels.is_empty() {
            let _ = logger.info(&format!(
                "No labels found for {}, using class indices",
                options.model_name
            ));
        }

        let _ = logger.info(&format!(
            "Loaded {} ({:?}, {} labels)",
            options.model_name,
            format,
            labels.len()
        ));

        Ok(Self {
            model,
            format,
            labels,
            max_results: options.max_results,
        })
    }
}

#[cfg(feature = "tflite")]
fn load_tflite(path: &Path) -> Result<TypedModel, Box<dyn std::error::Error + Send + Sync>> {
    Ok(tract_tflite::tflite().model_for_path(path)?)
}

#[cfg(not(feature = "tflite"))]
fn load_tflite(path: &Path) -> Result<TypedModel, Box<dyn std::error::Error + Send + Sync>> {
    Err(format!(
        "{} needs TFLite support, rebuild with the `tflite` feature",
        path.display()
    )
    .into())
}

impl ImageClassifier for ImageClassifierTract {
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let input = image_to_tensor(image, self.format.layout(), self.format.normalization());

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("model produced no outputs")?
            .to_array_view::<f32>()?;

        let scores: Vec<f32> = output.iter().copied().collect();

        Ok(top_categories(&scores, &self.labels, self.max_results))
    }
}
