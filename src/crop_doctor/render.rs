use crate::config::Config;
use crate::crop_doctor::core::{AdState, CameraState, ModelStatus, State};
use crate::device_display::interface::{CropView, DeviceDisplay, View};
use crate::library::logger::interface::Logger;
use std::sync::{Arc, Mutex, PoisonError};

const REMEDY_CARDS: [&str; 3] = ["Chemical", "Organic", "Traditional"];

pub fn view(config: &Config, state: &State) -> View {
    let crop_name = config
        .crops
        .get(state.selected_crop)
        .map(|crop| crop.name.as_str())
        .unwrap_or("crop");

    let camera_status = match &state.camera {
        CameraState::Disconnected => "Camera connecting...",
        CameraState::Starting => "Camera starting...",
        CameraState::Started => "Camera ready",
        CameraState::Failed(_) => "Camera unavailable",
    };

    let model_status = match state.model {
        ModelStatus::Loading => format!("Loading {} model...", crop_name),
        ModelStatus::Loaded => format!("{} model ready", crop_name),
        ModelStatus::Unavailable => format!("{} model unavailable", crop_name),
    };

    View {
        camera_status: camera_status.to_string(),
        crops: config
            .crops
            .iter()
            .enumerate()
            .map(|(index, crop)| CropView {
                name: crop.name.clone(),
                icon: crop.icon.clone(),
                selected: index == state.selected_crop,
            })
            .collect(),
        model_status,
        diagnosis: state.diagnosis.lines(),
        remedy_available: matches!(state.rewarded_ad, AdState::Ready(_)),
        remedy_cards: REMEDY_CARDS.iter().map(|card| card.to_string()).collect(),
        banner: state.banner.as_ref().map(|banner| banner.text.clone()),
    }
}

#[derive(Clone)]
pub struct Render {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("render"),
            device_display,
        }
    }

    pub fn render(&self, state: &State) {
        let view = view(&self.config, state);

        let rendered = self
            .device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .render(&view);

        if let Err(e) = rendered {
            let _ = self.logger.error(&format!("Failed to render: {}", e));
        }
    }
}
