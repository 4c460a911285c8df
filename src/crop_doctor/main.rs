use crate::config::Config;
use crate::crop_doctor::core::{init, transition, Effect, Event, Lifecycle, State};
use crate::crop_doctor::render::Render;
use crate::crop_doctor::run_effect::EffectRunner;
use crate::device_ads::interface::DeviceAds;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_speech::interface::DeviceSpeech;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::model_manager::main::ModelManager;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

pub struct CropDoctor {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    render: Render,
    effect_runner: Arc<EffectRunner>,
}

impl CropDoctor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        model_manager: Arc<ModelManager>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        device_ads: Arc<dyn DeviceAds + Send + Sync>,
        device_speech: Arc<dyn DeviceSpeech + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger.with_namespace("crop_doctor");
        let render = Render::new(config.clone(), logger.clone(), device_display.clone());
        let effect_runner = EffectRunner::new(
            config.clone(),
            logger.clone(),
            model_manager,
            device_camera,
            device_display,
            device_ads,
            device_speech,
        )?;

        Ok(Self {
            config,
            logger,
            render,
            effect_runner: Arc::new(effect_runner),
        })
    }

    /// Runs until the display is closed and shutdown has finished. Returns the final state.
    pub fn run(self) -> Result<State, Box<dyn std::error::Error + Send + Sync>> {
        let config = self.config.clone();
        let logger = self.logger.clone();
        let render = self.render.clone();
        let effect_runner = self.effect_runner.clone();

        let _ = self.logger.info("Starting...");

        let state_machine = StateMachine::new(
            init(&self.config),
            move |state: State, event: Event| {
                if !event.is_frame() {
                    let _ = logger.info(&format!("Event: {:?}", event));
                }
                transition(&config, state, event)
            },
            move |state: &State| render.render(state),
            move |effect: Effect, event_sender: Sender<Event>| {
                effect_runner.run_effect(effect, event_sender)
            },
            |state: &State| state.lifecycle == Lifecycle::Stopped,
        );

        let state = state_machine.run()?;

        let _ = self.logger.info(&format!(
            "Stopped. {} frames dropped while busy",
            state.frames_dropped
        ));

        Ok(state)
    }
}
