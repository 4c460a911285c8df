use crate::device_camera::interface::{DeviceCamera, DeviceCameraEvent, Frame};
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// Replays the images of a directory as a looping frame stream.
pub struct DeviceCameraDirectory {
    logger: Arc<dyn Logger + Send + Sync>,
    dir: PathBuf,
    frame_interval: Duration,
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl DeviceCameraDirectory {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, dir: PathBuf, frame_interval: Duration) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("directory"),
            dir,
            frame_interval,
            started: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }
}

pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

impl DeviceCamera for DeviceCameraDirectory {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let images = list_images(&self.dir)?;
        if images.is_empty() {
            return Err(format!("no images in {}", self.dir.display()).into());
        }
        self.started.store(true, Ordering::SeqCst);
        self.logger.info(&format!(
            "Replaying {} images from {}",
            images.len(),
            self.dir.display()
        ))?;
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
        let dir = self.dir.clone();
        let started = self.started.clone();
        let stopped = self.stopped.clone();
        let frame_interval = self.frame_interval;
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            let connected = if dir.is_dir() {
                DeviceCameraEvent::Connected
            } else {
                DeviceCameraEvent::Disconnected
            };
            if tx.send(connected).is_err() {
                return;
            }

            let mut sequence = 0u64;
            let mut images: Vec<PathBuf> = vec![];

            loop {
                std::thread::sleep(frame_interval);

                if stopped.load(Ordering::SeqCst) {
                    break;
                }

                if !started.load(Ordering::SeqCst) {
                    continue;
                }

                if images.is_empty() {
                    images = list_images(&dir).unwrap_or_default();
                    images.reverse();
                    if images.is_empty() {
                        continue;
                    }
                }

                let Some(path) = images.pop() else {
                    continue;
                };

                match image::open(&path) {
                    Ok(image) => {
                        sequence += 1;
                        let frame = Frame::new(sequence, image);
                        if tx.send(DeviceCameraEvent::FrameCaptured(frame)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = logger.error(&format!("Skipping {}: {}", path.display(), e));
                    }
                }
            }
        });

        rx
    }
}
