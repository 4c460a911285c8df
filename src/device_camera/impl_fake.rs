use crate::device_camera::interface::{DeviceCamera, DeviceCameraEvent, Frame};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageBuffer, Rgb};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

const FRAME_WIDTH: u32 = 320;
const FRAME_HEIGHT: u32 = 240;

/// Pushes synthetic leaf frames: green tissue with a random number of brown lesions.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    frame_interval: Duration,
    fail_start: bool,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, frame_interval: Duration) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            started: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
            frame_interval,
            fail_start: false,
        }
    }

    /// Simulates a camera that is present but cannot be bound.
    #[cfg(test)]
    pub fn with_start_failure(mut self) -> Self {
        self.fail_start = true;
        self
    }
}

pub fn synthetic_leaf(rng: &mut impl Rng) -> DynamicImage {
    let mut image = ImageBuffer::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgb([48, 146, 52]));
    let lesions = rng.random_range(0..12);

    for _ in 0..lesions {
        let cx = rng.random_range(0..FRAME_WIDTH) as i64;
        let cy = rng.random_range(0..FRAME_HEIGHT) as i64;
        let radius = rng.random_range(8..40) as i64;

        for y in (cy - radius).max(0)..(cy + radius).min(FRAME_HEIGHT as i64) {
            for x in (cx - radius).max(0)..(cx + radius).min(FRAME_WIDTH as i64) {
                if (x - cx).pow(2) + (y - cy).pow(2) <= radius.pow(2) {
                    image.put_pixel(x as u32, y as u32, Rgb([118, 74, 30]));
                }
            }
        }
    }

    DynamicImage::ImageRgb8(image)
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Starting camera...")?;
        if self.fail_start {
            return Err("camera use case binding failed".into());
        }
        self.started.store(true, Ordering::SeqCst);
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.started.store(false, Ordering::SeqCst);
        self.stopped.store(true, Ordering::SeqCst);
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn events(&self) -> mpsc::Receiver<DeviceCameraEvent> {
        let (tx, rx) = mpsc::channel();
        let started = self.started.clone();
        let stopped = self.stopped.clone();
        let frame_interval = self.frame_interval;

        std::thread::spawn(move || {
            if tx.send(DeviceCameraEvent::Connected).is_err() {
                return;
            }

            let mut rng = rand::rng();
            let mut sequence = 0;

            loop {
                std::thread::sleep(frame_interval);

                if stopped.load(Ordering::SeqCst) {
                    break;
                }

                if !started.load(Ordering::SeqCst) {
                    continue;
                }

                sequence += 1;
                let frame = Frame::new(sequence, synthetic_leaf(&mut rng));
                if tx.send(DeviceCameraEvent::FrameCaptured(frame)).is_err() {
                    break;
                }
            }
        });

        rx
    }
}
