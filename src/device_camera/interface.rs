use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

/// One captured image. Cloning shares the pixels.
#[derive(Clone, PartialEq)]
pub struct Frame {
    pub sequence: u64,
    pub image: Arc<DynamicImage>,
}

impl Frame {
    pub fn new(sequence: u64, image: DynamicImage) -> Self {
        Self {
            sequence,
            image: Arc::new(image),
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("sequence", &self.sequence)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCameraEvent {
    Disconnected,
    Connected,
    FrameCaptured(Frame),
}

pub trait DeviceCamera {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Ends the event stream for good.
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Connection changes, and a frame per capture while started.
    fn events(&self) -> std::sync::mpsc::Receiver<DeviceCameraEvent>;
}
