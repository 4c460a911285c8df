use crate::device_display::interface::{DeviceDisplay, DeviceDisplayEvent, View};
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

struct DisplayWindow {
    view: Arc<Mutex<Option<View>>>,
    events: Sender<DeviceDisplayEvent>,
}

impl DisplayWindow {
    fn send(&self, event: DeviceDisplayEvent) {
        let _ = self.events.send(event);
    }
}

impl eframe::App for DisplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let view = self
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(view) = view else {
                ui.label("Starting...");
                return;
            };

            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(&view.camera_status).monospace());
                ui.label(egui::RichText::new(&view.model_status).weak());
            });

            ui.separator();

            ui.horizontal_wrapped(|ui| {
                for (index, crop) in view.crops.iter().enumerate() {
                    if ui.selectable_label(crop.selected, crop.name.as_str()).clicked() {
                        self.send(DeviceDisplayEvent::CropSelected(index));
                    }
                }
            });

            ui.separator();

            ui.vertical_centered(|ui| {
                for line in &view.diagnosis {
                    ui.label(egui::RichText::new(line).size(18.0));
                }

                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("Play Audio").clicked() {
                        self.send(DeviceDisplayEvent::PlayAudioPressed);
                    }
                    ui.add_space(16.0);
                    let remedy = ui.add_enabled(
                        view.remedy_available,
                        egui::Button::new("Get Expert Remedy"),
                    );
                    if remedy.clicked() {
                        self.send(DeviceDisplayEvent::GetRemedyPressed);
                    }
                });
            });

            ui.add_space(8.0);

            ui.columns(view.remedy_cards.len().max(1), |columns| {
                for (column, card) in columns.iter_mut().zip(&view.remedy_cards) {
                    column.group(|ui| {
                        ui.vertical_centered(|ui| ui.label(card.as_str()));
                    });
                }
            });

            if let Some(banner) = &view.banner {
                ui.separator();
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(banner).small().weak());
                });
            }
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Window display. Rendering only stores the latest view; the window itself is driven by the
/// [`GuiRunner`], which must run on the main thread.
pub struct DeviceDisplayGui {
    view: Arc<Mutex<Option<View>>>,
    sender: Sender<DeviceDisplayEvent>,
    receiver: Mutex<Option<Receiver<DeviceDisplayEvent>>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            view: Arc::new(Mutex::new(None)),
            sender,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    pub fn runner(&self) -> GuiRunner {
        GuiRunner {
            view: self.view.clone(),
            sender: self.sender.clone(),
        }
    }
}

pub struct GuiRunner {
    view: Arc<Mutex<Option<View>>>,
    sender: Sender<DeviceDisplayEvent>,
}

impl GuiRunner {
    /// Blocks until the window is closed, then reports [`DeviceDisplayEvent::Closed`].
    pub fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([420.0, 360.0])
                .with_resizable(true),
            ..Default::default()
        };

        let window = DisplayWindow {
            view: self.view.clone(),
            events: self.sender.clone(),
        };

        let result = eframe::run_native(
            "Crop Doctor",
            options,
            Box::new(move |_cc| Box::new(window)),
        );

        let _ = self.sender.send(DeviceDisplayEvent::Closed);

        result.map_err(|e| e.to_string().into())
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.view.lock().unwrap_or_else(PoisonError::into_inner) = Some(view.clone());
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
