use crate::config::Config;
use crate::image_classifier::interface::{
    Accelerator, Classification, ClassifierOptions, ImageClassifierLoader, ResizeMethod,
};
use crate::image_classifier::resize::resize_to_input;
use crate::library::logger::interface::Logger;
use crate::model_manager::slot::{ClassifierSlot, ModelState};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

/// Owns the single classifier handle and mediates every load, classify and release on it.
///
/// Loads take the slot lock and hold it for the whole swap. Classification only ever
/// `try_lock`s, so a classify call that races a swap sees no classifier and returns an empty
/// result instead of blocking or touching a half-released handle.
pub struct ModelManager {
    loader: Arc<dyn ImageClassifierLoader + Send + Sync>,
    slot: Mutex<ClassifierSlot>,
    logger: Arc<dyn Logger + Send + Sync>,
    models_dir: PathBuf,
    input_size: (u32, u32),
    resize: ResizeMethod,
    accelerator: Accelerator,
    cpu_fallback: bool,
    max_results: usize,
}

impl ModelManager {
    pub fn new(
        config: &Config,
        loader: Arc<dyn ImageClassifierLoader + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            loader,
            slot: Mutex::new(ClassifierSlot::Unloaded),
            logger: logger.with_namespace("model_manager"),
            models_dir: config.models_dir.clone(),
            input_size: config.classifier_input_size,
            resize: config.classifier_resize,
            accelerator: config.classifier_accelerator,
            cpu_fallback: config.classifier_cpu_fallback,
            max_results: config.classifier_max_results,
        }
    }

    fn options_for(&self, model_name: &str) -> ClassifierOptions {
        ClassifierOptions {
            model_name: model_name.to_string(),
            model_path: self.models_dir.join(model_name),
            input_size: self.input_size,
            resize: self.resize,
            accelerator: self.accelerator,
            cpu_fallback: self.cpu_fallback,
            max_results: self.max_results,
        }
    }

    /// Releases the current classifier, then tries to load `model_name`. Failures are logged
    /// and leave the manager unloaded.
    pub fn load_model(&self, model_name: &str) -> ModelState {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = slot.release() {
            let _ = self.logger.info(&format!("Released {}", previous));
        }

        match self.loader.load(&self.options_for(model_name)) {
            Ok(classifier) => {
                slot.install(model_name.to_string(), classifier);
                let _ = self.logger.info(&format!("Loaded {}", model_name));
            }
            Err(e) => {
                let _ = self
                    .logger
                    .error(&format!("Failed to load {}: {}", model_name, e));
            }
        }

        slot.state()
    }

    pub fn classify(&self, image: &DynamicImage) -> Vec<Classification> {
        let slot = match self.slot.try_lock() {
            Ok(slot) => slot,
            Err(TryLockError::WouldBlock) => return vec![],
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let Some(classifier) = slot.classifier() else {
            return vec![];
        };

        let input = resize_to_input(image, self.input_size, self.resize);

        match classifier.classify(&input) {
            Ok(mut classifications) => {
                classifications.truncate(self.max_results);
                classifications
            }
            Err(e) => {
                let _ = self.logger.error(&format!("Classification failed: {}", e));
                vec![]
            }
        }
    }

    /// `classify` formatted as `"label - score"` lines.
    pub fn classify_display(&self, image: &DynamicImage) -> Vec<String> {
        self.classify(image)
            .iter()
            .map(|classification| classification.to_string())
            .collect()
    }

    pub fn close(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.release() {
            let _ = self.logger.info(&format!("Released {}", previous));
        }
    }

    pub fn state(&self) -> ModelState {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state()
    }
}
