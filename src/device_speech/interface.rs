pub trait DeviceSpeech {
    fn speak(&self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
