use std::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct CropView {
    pub name: String,
    pub icon: String,
    pub selected: bool,
}

/// Everything a display shows for one state of the app.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub camera_status: String,
    pub crops: Vec<CropView>,
    pub model_status: String,
    pub diagnosis: Vec<String>,
    /// Whether "Get Expert Remedy" currently has an ad to show.
    pub remedy_available: bool,
    pub remedy_cards: Vec<String>,
    pub banner: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceDisplayEvent {
    CropSelected(usize),
    PlayAudioPressed,
    GetRemedyPressed,
    Closed,
}

pub trait DeviceDisplay: Send + Sync {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// User interactions. Only the first subscriber receives them.
    fn events(&self) -> std::sync::mpsc::Receiver<DeviceDisplayEvent>;
}
