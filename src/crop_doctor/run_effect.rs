use crate::config::Config;
use crate::crop_doctor::core::{Effect, Event};
use crate::device_ads::interface::{AdResult, DeviceAds};
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_speech::interface::DeviceSpeech;
use crate::library::logger::interface::Logger;
use crate::library::worker::SingleWorker;
use crate::model_manager::main::ModelManager;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

/// Executes effects against the devices. Classification and model loading each go through their
/// own single worker thread so that neither ever runs concurrently with itself.
pub struct EffectRunner {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    model_manager: Arc<ModelManager>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    device_ads: Arc<dyn DeviceAds + Send + Sync>,
    device_speech: Arc<dyn DeviceSpeech + Send + Sync>,
    analysis_worker: SingleWorker,
    model_worker: SingleWorker,
    /// Newest generation a model load was requested for. Queued loads for older generations
    /// are skipped, whatever order their effect threads reached the model worker in.
    latest_model_generation: Arc<AtomicU64>,
}

fn await_ad<T>(receiver: Receiver<AdResult<T>>) -> AdResult<T> {
    receiver
        .recv()
        .unwrap_or_else(|_| Err("ad request was dropped".into()))
}

impl EffectRunner {
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
        Ok(Self {
            config,
            logger: logger.with_namespace("effect"),
            model_manager,
            device_camera,
            device_display,
            device_ads,
            device_speech,
            analysis_worker: SingleWorker::new("analysis")?,
            model_worker: SingleWorker::new("model")?,
            latest_model_generation: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn run_effect(&self, effect: Effect, event_sender: Sender<Event>) {
        if !matches!(effect, Effect::ClassifyFrame { .. }) {
            let _ = self.logger.info(&format!("Running effect: {:?}", effect));
        }

        match effect {
            Effect::SubscribeToCameraEvents => {
                for event in self.device_camera.events() {
                    if event_sender.send(Event::CameraEvent(event)).is_err() {
                        break;
                    }
                }
            }
            Effect::SubscribeToDisplayEvents => {
                let events = self
                    .device_display
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .events();

                for event in events {
                    if event_sender.send(Event::DisplayEvent(event)).is_err() {
                        break;
                    }
                }
            }
            Effect::StartCamera => {
                let started = self.device_camera.start();
                if let Err(e) = &started {
                    let _ = self.logger.error(&format!("Use case binding failed: {}", e));
                }
                let _ = event_sender.send(Event::CameraStartDone(started));
            }
            Effect::LoadModel {
                generation,
                model_name,
            } => {
                self.latest_model_generation
                    .fetch_max(generation, Ordering::SeqCst);

                let latest_model_generation = self.latest_model_generation.clone();
                let model_manager = self.model_manager.clone();
                let logger = self.logger.clone();
                let sender = event_sender.clone();
                let queued = self.model_worker.execute(move || {
                    let latest = latest_model_generation.load(Ordering::SeqCst);
                    if generation < latest {
                        let _ = logger.info(&format!(
                            "Skipping {}, superseded by generation {}",
                            model_name, latest
                        ));
                        return;
                    }
                    let state = model_manager.load_model(&model_name);
                    let _ = sender.send(Event::ModelLoadDone { generation, state });
                });

                if let Err(e) = queued {
                    let _ = self.logger.error(&format!("Failed to queue model load: {}", e));
                }
            }
            Effect::ClassifyFrame { generation, frame } => {
                let model_manager = self.model_manager.clone();
                let sender = event_sender.clone();
                let queued = self.analysis_worker.execute(move || {
                    let classifications = model_manager.classify(&frame.image);
                    let _ = sender.send(Event::FrameClassifyDone {
                        generation,
                        classifications,
                    });
                });

                if let Err(e) = queued {
                    let _ = self.logger.error(&format!("Failed to queue frame: {}", e));
                    let _ = event_sender.send(Event::FrameClassifySkipped);
                }
            }
            Effect::LoadRewardedAd => {
                let result = await_ad(
                    self.device_ads
                        .load_rewarded(&self.config.rewarded_ad_unit_id),
                );
                match &result {
                    Ok(_) => {
                        let _ = self.logger.info("Ad was loaded.");
                    }
                    Err(e) => {
                        let _ = self.logger.error(&format!("Ad failed to load: {}", e));
                    }
                }
                let _ = event_sender.send(Event::RewardedAdLoadDone(result));
            }
            Effect::ShowRewardedAd(ad) => {
                let result = await_ad(self.device_ads.show_rewarded(ad));
                match &result {
                    Ok(reward) => {
                        let _ = self.logger.info(&format!(
                            "User earned the reward: {} x{}",
                            reward.kind, reward.amount
                        ));
                    }
                    Err(e) => {
                        let _ = self.logger.error(&format!("Ad failed to show: {}", e));
                    }
                }
                let _ = event_sender.send(Event::RewardedAdShowDone(result));
            }
            Effect::ReportAdNotReady => {
                let _ = self.logger.info("The rewarded ad wasn't ready yet.");
            }
            Effect::LoadBannerAd => {
                let result = await_ad(self.device_ads.load_banner(&self.config.banner_ad_unit_id));
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Banner failed to load: {}", e));
                }
                let _ = event_sender.send(Event::BannerAdLoadDone(result));
            }
            Effect::Speak { text } => {
                let spoken = self.device_speech.speak(&text);
                if let Err(e) = &spoken {
                    let _ = self.logger.error(&format!("Failed to play audio: {}", e));
                }
                let _ = event_sender.send(Event::SpeakDone(spoken));
            }
            Effect::Shutdown => {
                self.analysis_worker.shutdown();
                self.model_worker.shutdown();

                if let Err(e) = self.device_camera.stop() {
                    let _ = self.logger.error(&format!("Failed to stop camera: {}", e));
                }

                self.model_manager.close();
                let _ = event_sender.send(Event::ShutdownDone);
            }
        }
    }
}
