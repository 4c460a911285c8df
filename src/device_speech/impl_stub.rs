use crate::device_speech::interface::DeviceSpeech;
use crate::library::logger::interface::Logger;
use std::sync::Arc;

/// No speech engine is wired up; every request is logged and refused.
pub struct DeviceSpeechStub {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceSpeechStub {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("speech").with_namespace("stub"),
        }
    }
}

impl DeviceSpeech for DeviceSpeechStub {
    fn speak(&self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("Asked to speak: {:?}", text))?;
        Err("text-to-speech is not available".into())
    }
}
