use crate::device_display::interface::{DeviceDisplay, DeviceDisplayEvent, View};
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

/// Records every rendered view; events are injected through [`DeviceDisplayFake::sender`].
pub struct DeviceDisplayFake {
    views: Arc<Mutex<Vec<View>>>,
    sender: Sender<DeviceDisplayEvent>,
    receiver: Mutex<Option<Receiver<DeviceDisplayEvent>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            views: Arc::new(Mutex::new(vec![])),
            sender,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    pub fn sender(&self) -> Sender<DeviceDisplayEvent> {
        self.sender.clone()
    }

    pub fn views(&self) -> Arc<Mutex<Vec<View>>> {
        self.views.clone()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(view.clone());
        Ok(())
    }

    fn events(&self) -> Receiver<DeviceDisplayEvent> {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| channel().1)
    }
}
