use crate::device_display::interface::{DeviceDisplay, DeviceDisplayEvent, View};
use std::error::Error;
use std::io::BufRead;
use std::sync::mpsc;

const WIDTH: usize = 44;

pub struct DeviceDisplayConsole {
    last_view: Option<View>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self { last_view: None }
    }
}

fn boxed_line(text: &str) -> String {
    let clipped: String = text.chars().take(WIDTH).collect();
    let padding = WIDTH - clipped.chars().count();
    format!("│{}{}│", clipped, " ".repeat(padding))
}

pub fn render_lines(view: &View) -> Vec<String> {
    let border = "─".repeat(WIDTH);
    let mut lines = vec![format!("┌{}┐", border)];

    lines.push(boxed_line(&view.camera_status));
    lines.push(boxed_line(&view.model_status));
    lines.push(format!("├{}┤", border));

    let crops = view
        .crops
        .iter()
        .enumerate()
        .map(|(i, crop)| {
            if crop.selected {
                format!("[{}:{}]", i + 1, crop.name)
            } else {
                format!(" {}:{} ", i + 1, crop.name)
            }
        })
        .collect::<Vec<_>>()
        .join("");
    lines.push(boxed_line(&crops));
    lines.push(format!("├{}┤", border));

    for line in &view.diagnosis {
        lines.push(boxed_line(line));
    }
    lines.push(boxed_line(""));

    let remedy = if view.remedy_available {
        "(r) Get Expert Remedy"
    } else {
        "(r) Get Expert Remedy [unavailable]"
    };
    lines.push(boxed_line(&format!("(a) Play Audio  {}", remedy)));
    lines.push(boxed_line(&view.remedy_cards.join(" | ")));

    if let Some(banner) = &view.banner {
        lines.push(format!("├{}┤", border));
        lines.push(boxed_line(banner));
    }

    lines.push(format!("└{}┘", border));
    lines
}

/// `1`..`9` select a crop, `a` plays audio, `r` asks for a remedy, `q` quits.
pub fn parse_command(input: &str) -> Option<DeviceDisplayEvent> {
    let input = input.trim();
    match input {
        "a" => Some(DeviceDisplayEvent::PlayAudioPressed),
        "r" => Some(DeviceDisplayEvent::GetRemedyPressed),
        "q" => Some(DeviceDisplayEvent::Closed),
        _ => match input.parse::<usize>() {
            Ok(n) if n >= 1 => Some(DeviceDisplayEvent::CropSelected(n - 1)),
            _ => None,
        },
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.last_view.as_ref() == Some(view) {
            return Ok(());
        }

        for line in render_lines(view) {
            println!("{}", line);
        }

        self.last_view = Some(view.clone());
        Ok(())
    }

    fn events(&self) -> mpsc::Receiver<DeviceDisplayEvent> {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if let Some(event) = parse_command(&line) {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(DeviceDisplayEvent::Closed);
        });

        rx
    }
}
