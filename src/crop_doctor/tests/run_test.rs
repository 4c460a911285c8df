use super::fixture::Fixture;
use crate::crop_doctor::core::Lifecycle;
use crate::device_display::interface::DeviceDisplayEvent;
use crate::model_manager::slot::ModelState;
use std::time::{Duration, Instant};

const PENDING: &str = "Diagnosis will appear here.";

fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn test_publishes_diagnosis_and_shuts_down() {
    let Fixture {
        logger,
        model_manager,
        views,
        display_events,
        crop_doctor,
        ..
    } = Fixture::new();

    let running = std::thread::spawn(move || crop_doctor.run());

    let diagnosed = wait_for(|| {
        views.lock().unwrap().iter().any(|view| {
            view.camera_status == "Camera ready"
                && view.model_status == "apple model ready"
                && view.diagnosis.first().is_some_and(|line| line.starts_with("Apple"))
        })
    });
    assert!(diagnosed, "no diagnosis was published");
    assert!(model_manager.state() != ModelState::Unloaded);

    display_events.send(DeviceDisplayEvent::Closed).unwrap();
    let state = running.join().unwrap().unwrap();

    assert_eq!(state.lifecycle, Lifecycle::Stopped);
    assert_eq!(model_manager.state(), ModelState::Unloaded);
    assert!(logger.contains("Camera stopped"));
}

#[test]
fn test_crop_switch_loads_new_model() {
    let f = Fixture::new();
    let views = f.views.clone();
    let display_events = f.display_events.clone();
    let model_manager = f.model_manager.clone();
    let tomato = f.config.crops[1].model_name.clone();

    let running = std::thread::spawn(move || f.crop_doctor.run());

    assert!(wait_for(|| views
        .lock()
        .unwrap()
        .iter()
        .any(|view| view.model_status == "apple model ready")));

    display_events
        .send(DeviceDisplayEvent::CropSelected(1))
        .unwrap();

    assert!(wait_for(|| views.lock().unwrap().last().is_some_and(|view| {
        view.crops[1].selected
            && view.model_status == "tomato model ready"
            && view.diagnosis[0] != PENDING
    })));
    assert_eq!(model_manager.state(), ModelState::Loaded(tomato));

    display_events.send(DeviceDisplayEvent::Closed).unwrap();
    running.join().unwrap().unwrap();
}

#[test]
fn test_back_to_back_crop_switches_load_the_last_choice() {
    let f = Fixture::new();
    let views = f.views.clone();
    let display_events = f.display_events.clone();
    let model_manager = f.model_manager.clone();
    let apple = f.config.crops[0].model_name.clone();
    let potato = f.config.crops[2].model_name.clone();

    let running = std::thread::spawn(move || f.crop_doctor.run());

    let showing = |crop: usize, status: &str| {
        let status = status.to_string();
        let views = views.clone();
        move || {
            views
                .lock()
                .unwrap()
                .last()
                .is_some_and(|view| view.crops[crop].selected && view.model_status == status)
        }
    };

    assert!(wait_for(showing(0, "apple model ready")));

    for round in 0..20 {
        display_events
            .send(DeviceDisplayEvent::CropSelected(1))
            .unwrap();
        display_events
            .send(DeviceDisplayEvent::CropSelected(2))
            .unwrap();

        assert!(wait_for(showing(2, "potato model ready")), "round {}", round);
        assert_eq!(
            model_manager.state(),
            ModelState::Loaded(potato.clone()),
            "round {}",
            round
        );

        display_events
            .send(DeviceDisplayEvent::CropSelected(0))
            .unwrap();

        assert!(wait_for(showing(0, "apple model ready")), "round {}", round);
        assert_eq!(model_manager.state(), ModelState::Loaded(apple.clone()));
    }

    display_events.send(DeviceDisplayEvent::Closed).unwrap();
    running.join().unwrap().unwrap();
}

#[test]
fn test_camera_start_failure_keeps_app_running() {
    let Fixture {
        logger,
        views,
        display_events,
        crop_doctor,
        ..
    } = Fixture::with_camera_start_failure();

    let running = std::thread::spawn(move || crop_doctor.run());

    assert!(wait_for(|| views.lock().unwrap().last().is_some_and(|view| {
        view.camera_status == "Camera unavailable" && view.model_status == "apple model ready"
    })));
    assert!(logger.contains("Use case binding failed"));
    assert!(views
        .lock()
        .unwrap()
        .iter()
        .all(|view| view.diagnosis == vec![PENDING]));

    display_events.send(DeviceDisplayEvent::Closed).unwrap();
    let state = running.join().unwrap().unwrap();

    assert_eq!(state.lifecycle, Lifecycle::Stopped);
}
