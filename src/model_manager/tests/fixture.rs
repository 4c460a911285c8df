use crate::config::Config;
use crate::image_classifier::impl_fake::ImageClassifierLoaderFake;
use crate::library::logger::impl_memory::LoggerMemory;
use crate::model_manager::main::ModelManager;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::Arc;
use std::time::Duration;

pub const TOMATO: &str = "Tomato_model_unquant.tflite";
pub const POTATO: &str = "Potato_model_unquant.tflite";

pub struct Fixture {
    pub config: Config,
    pub logger: LoggerMemory,
    pub loader: Arc<ImageClassifierLoaderFake>,
    pub model_manager: Arc<ModelManager>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_load_delay(Duration::ZERO)
    }

    pub fn with_load_delay(load_delay: Duration) -> Self {
        let config = Config::default();
        let logger = LoggerMemory::new();
        let loader = Arc::new(
            ImageClassifierLoaderFake::new(Arc::new(logger.clone())).with_load_delay(load_delay),
        );
        let model_manager = Arc::new(ModelManager::new(
            &config,
            loader.clone(),
            Arc::new(logger.clone()),
        ));

        Self {
            config,
            logger,
            loader,
            model_manager,
        }
    }
}

/// A 640x480 leaf whose top three quarters are covered in brown lesions.
pub fn blighted_leaf() -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(640, 480, |_, y| {
        if y < 360 {
            Rgb([115, 72, 28])
        } else {
            Rgb([45, 150, 55])
        }
    }))
}

pub fn healthy_leaf() -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(320, 240, Rgb([45, 150, 55])))
}
