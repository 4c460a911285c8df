use config::{CameraSource, ClassifierEngine, Config, DisplayKind};
use crop_doctor::main::CropDoctor;
use device_ads::impl_fake::DeviceAdsFake;
use device_camera::impl_directory::DeviceCameraDirectory;
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::interface::DeviceCamera;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use device_display::interface::DeviceDisplay;
use device_speech::impl_stub::DeviceSpeechStub;
use image_classifier::impl_fake::ImageClassifierLoaderFake;
use image_classifier::impl_tract::ImageClassifierLoaderTract;
use image_classifier::interface::ImageClassifierLoader;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use model_manager::main::ModelManager;
use std::sync::{Arc, Mutex};

mod config;
mod crop;
mod crop_doctor;
mod device_ads;
mod device_camera;
mod device_display;
mod device_speech;
mod image_classifier;
mod library;
mod model_manager;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let loader: Arc<dyn ImageClassifierLoader + Send + Sync> = match config.classifier_engine {
        ClassifierEngine::Fake => Arc::new(ImageClassifierLoaderFake::new(logger.clone())),
        ClassifierEngine::Tract => Arc::new(ImageClassifierLoaderTract::new(logger.clone())),
    };

    let model_manager = Arc::new(ModelManager::new(&config, loader, logger.clone()));

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = match config.camera_source {
        CameraSource::Fake => Arc::new(DeviceCameraFake::new(
            logger.clone(),
            config.camera_frame_interval,
        )),
        CameraSource::Directory => Arc::new(DeviceCameraDirectory::new(
            logger.clone(),
            config.camera_frames_dir.clone(),
            config.camera_frame_interval,
        )),
    };

    let device_ads = Arc::new(DeviceAdsFake::new(
        logger.clone(),
        config.ad_load_latency,
        config.ad_fill_rate,
    ));

    let device_speech = Arc::new(DeviceSpeechStub::new(logger.clone()));

    match config.display {
        DisplayKind::Console => {
            let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
                Arc::new(Mutex::new(DeviceDisplayConsole::new()));

            let crop_doctor = CropDoctor::new(
                config,
                logger,
                model_manager,
                device_camera,
                device_display,
                device_ads,
                device_speech,
            )?;

            crop_doctor.run()?;
        }
        DisplayKind::Gui => {
            let device_display = DeviceDisplayGui::new();
            let gui_runner = device_display.runner();

            let crop_doctor = CropDoctor::new(
                config,
                logger,
                model_manager,
                device_camera,
                Arc::new(Mutex::new(device_display)),
                device_ads,
                device_speech,
            )?;

            let running = std::thread::spawn(move || crop_doctor.run().map(|_| ()));

            // The window has to own the main thread.
            gui_runner.run()?;

            running
                .join()
                .map_err(|_| "crop doctor thread panicked")??;
        }
    }

    Ok(())
}
