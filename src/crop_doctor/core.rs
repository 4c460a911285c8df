use crate::config::Config;
use crate::device_ads::interface::{AdResult, BannerAd, Reward, RewardedAd};
use crate::device_camera::interface::{DeviceCameraEvent, Frame};
use crate::device_display::interface::DeviceDisplayEvent;
use crate::image_classifier::interface::Classification;
use crate::model_manager::slot::ModelState;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CameraState {
    #[default]
    Disconnected,
    Starting,
    Started,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelStatus {
    Loading,
    Loaded,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Diagnosis {
    #[default]
    Pending,
    Published(Vec<Classification>),
}

impl Diagnosis {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Diagnosis::Pending => vec!["Diagnosis will appear here.".to_string()],
            Diagnosis::Published(classifications) if classifications.is_empty() => {
                vec!["No diagnosis available.".to_string()]
            }
            Diagnosis::Published(classifications) => {
                classifications.iter().map(|c| c.to_string()).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdState {
    Loading,
    Ready(RewardedAd),
    Showing,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    ShuttingDown,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub selected_crop: usize,
    /// Bumped on every crop switch. Work started under an older generation is stale.
    pub generation: u64,
    pub camera: CameraState,
    pub model: ModelStatus,
    /// A frame is queued on, or running in, the analysis worker.
    pub in_flight: bool,
    pub diagnosis: Diagnosis,
    pub rewarded_ad: AdState,
    pub banner: Option<BannerAd>,
    pub frames_dropped: u64,
    pub lifecycle: Lifecycle,
}

#[derive(Debug)]
pub enum Event {
    CameraEvent(DeviceCameraEvent),
    CameraStartDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    DisplayEvent(DeviceDisplayEvent),
    ModelLoadDone {
        generation: u64,
        state: ModelState,
    },
    FrameClassifyDone {
        generation: u64,
        classifications: Vec<Classification>,
    },
    FrameClassifySkipped,
    RewardedAdLoadDone(AdResult<RewardedAd>),
    RewardedAdShowDone(AdResult<Reward>),
    BannerAdLoadDone(AdResult<BannerAd>),
    SpeakDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    ShutdownDone,
}

impl Event {
    /// Per-frame events arrive many times a second and are left out of the event log.
    pub fn is_frame(&self) -> bool {
        matches!(
            self,
            Event::CameraEvent(DeviceCameraEvent::FrameCaptured(_))
                | Event::FrameClassifyDone { .. }
                | Event::FrameClassifySkipped
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubscribeToCameraEvents,
    SubscribeToDisplayEvents,
    StartCamera,
    LoadModel { generation: u64, model_name: String },
    ClassifyFrame { generation: u64, frame: Frame },
    LoadRewardedAd,
    ShowRewardedAd(RewardedAd),
    ReportAdNotReady,
    LoadBannerAd,
    Speak { text: String },
    Shutdown,
}

pub fn init(config: &Config) -> (State, Vec<Effect>) {
    let first_crop = config.crops.first();

    let state = State {
        selected_crop: 0,
        generation: 0,
        camera: CameraState::Disconnected,
        model: match first_crop {
            Some(_) => ModelStatus::Loading,
            None => ModelStatus::Unavailable,
        },
        in_flight: false,
        diagnosis: Diagnosis::Pending,
        rewarded_ad: AdState::Loading,
        banner: None,
        frames_dropped: 0,
        lifecycle: Lifecycle::Running,
    };

    let mut effects = vec![
        Effect::SubscribeToCameraEvents,
        Effect::SubscribeToDisplayEvents,
    ];
    if let Some(crop) = first_crop {
        effects.push(Effect::LoadModel {
            generation: 0,
            model_name: crop.model_name.clone(),
        });
    }
    effects.push(Effect::LoadRewardedAd);
    effects.push(Effect::LoadBannerAd);

    (state, effects)
}

pub fn transition(config: &Config, state: State, event: Event) -> (State, Vec<Effect>) {
    match state.lifecycle {
        Lifecycle::Running => transition_running(config, state, event),
        Lifecycle::ShuttingDown => match event {
            Event::ShutdownDone => (
                State {
                    lifecycle: Lifecycle::Stopped,
                    ..state
                },
                vec![],
            ),
            _ => (state, vec![]),
        },
        Lifecycle::Stopped => (state, vec![]),
    }
}

fn transition_running(config: &Config, mut state: State, event: Event) -> (State, Vec<Effect>) {
    match event {
        // Camera
        Event::CameraEvent(DeviceCameraEvent::Connected) => {
            if state.camera == CameraState::Disconnected {
                state.camera = CameraState::Starting;
                (state, vec![Effect::StartCamera])
            } else {
                (state, vec![])
            }
        }
        Event::CameraEvent(DeviceCameraEvent::Disconnected) => {
            state.camera = CameraState::Disconnected;
            (state, vec![])
        }
        Event::CameraStartDone(Ok(())) => {
            state.camera = CameraState::Started;
            (state, vec![])
        }
        Event::CameraStartDone(Err(e)) => {
            state.camera = CameraState::Failed(e.to_string());
            (state, vec![])
        }

        // Keep only the latest frame: anything that arrives while busy is dropped.
        Event::CameraEvent(DeviceCameraEvent::FrameCaptured(frame)) => {
            if state.camera != CameraState::Started {
                return (state, vec![]);
            }
            if state.in_flight || state.model == ModelStatus::Loading {
                state.frames_dropped += 1;
                return (state, vec![]);
            }
            state.in_flight = true;
            let generation = state.generation;
            (state, vec![Effect::ClassifyFrame { generation, frame }])
        }
        Event::FrameClassifyDone {
            generation,
            classifications,
        } => {
            state.in_flight = false;
            if generation == state.generation {
                state.diagnosis = Diagnosis::Published(classifications);
            }
            (state, vec![])
        }
        Event::FrameClassifySkipped => {
            state.in_flight = false;
            (state, vec![])
        }

        // Model
        Event::DisplayEvent(DeviceDisplayEvent::CropSelected(index)) => {
            let Some(crop) = config.crops.get(index) else {
                return (state, vec![]);
            };
            if index == state.selected_crop {
                return (state, vec![]);
            }
            state.selected_crop = index;
            state.generation += 1;
            state.model = ModelStatus::Loading;
            state.diagnosis = Diagnosis::Pending;
            let effect = Effect::LoadModel {
                generation: state.generation,
                model_name: crop.model_name.clone(),
            };
            (state, vec![effect])
        }
        Event::ModelLoadDone { generation, state: model_state } => {
            if generation != state.generation {
                return (state, vec![]);
            }
            let expected = config
                .crops
                .get(state.selected_crop)
                .map(|crop| crop.model_name.as_str());
            state.model = match model_state {
                ModelState::Loaded(name) if Some(name.as_str()) == expected => ModelStatus::Loaded,
                _ => ModelStatus::Unavailable,
            };
            (state, vec![])
        }

        // Diagnosis actions
        Event::DisplayEvent(DeviceDisplayEvent::PlayAudioPressed) => {
            let text = state.diagnosis.lines().join(". ");
            (state, vec![Effect::Speak { text }])
        }
        Event::SpeakDone(_) => (state, vec![]),
        Event::DisplayEvent(DeviceDisplayEvent::GetRemedyPressed) => {
            match std::mem::replace(&mut state.rewarded_ad, AdState::Showing) {
                AdState::Ready(ad) => (state, vec![Effect::ShowRewardedAd(ad)]),
                previous => {
                    state.rewarded_ad = previous;
                    (state, vec![Effect::ReportAdNotReady])
                }
            }
        }

        // Ads
        Event::RewardedAdLoadDone(Ok(ad)) => {
            state.rewarded_ad = AdState::Ready(ad);
            (state, vec![])
        }
        Event::RewardedAdLoadDone(Err(_)) => {
            state.rewarded_ad = AdState::Unavailable;
            (state, vec![])
        }
        Event::RewardedAdShowDone(_) => {
            state.rewarded_ad = AdState::Loading;
            (state, vec![Effect::LoadRewardedAd])
        }
        Event::BannerAdLoadDone(result) => {
            state.banner = result.ok();
            (state, vec![])
        }

        // Lifecycle
        Event::DisplayEvent(DeviceDisplayEvent::Closed) => {
            state.lifecycle = Lifecycle::ShuttingDown;
            (state, vec![Effect::Shutdown])
        }
        Event::ShutdownDone => {
            state.lifecycle = Lifecycle::Stopped;
            (state, vec![])
        }
    }
}
