use super::fixture::{blighted_leaf, healthy_leaf, Fixture, POTATO, TOMATO};
use crate::model_manager::slot::ModelState;
use std::time::Duration;

#[test]
fn test_classify_before_load_is_empty() {
    let f = Fixture::new();

    assert!(f.model_manager.classify(&healthy_leaf()).is_empty());
    assert_eq!(f.model_manager.state(), ModelState::Unloaded);
}

#[test]
fn test_every_catalog_model_classifies() {
    let f = Fixture::new();

    for crop in &f.config.crops {
        let state = f.model_manager.load_model(&crop.model_name);
        assert_eq!(state, ModelState::Loaded(crop.model_name.clone()));

        let result = f.model_manager.classify(&blighted_leaf());

        assert!(!result.is_empty(), "{} returned nothing", crop.name);
        assert!(result.len() <= 3);
        assert!(result
            .iter()
            .all(|c| (0.0..=1.0).contains(&c.confidence)));
    }
}

#[test]
fn test_tomato_blight_is_ranked_first() {
    let f = Fixture::new();
    f.model_manager.load_model(TOMATO);

    let result = f.model_manager.classify(&blighted_leaf());

    assert!(result[0].label.contains("blight"));
    assert!(result
        .iter()
        .skip(1)
        .all(|c| c.confidence <= result[0].confidence));
}

#[test]
fn test_invalid_model_leaves_manager_unloaded() {
    let f = Fixture::new();

    let state = f.model_manager.load_model("Banana_model_unquant.tflite");

    assert_eq!(state, ModelState::Unloaded);
    assert!(f.model_manager.classify(&healthy_leaf()).is_empty());
    assert!(f.logger.contains("Failed to load Banana_model_unquant.tflite"));
}

#[test]
fn test_failed_swap_releases_previous_model() {
    let f = Fixture::new();
    f.model_manager.load_model(TOMATO);

    let state = f.model_manager.load_model("missing.tflite");

    assert_eq!(state, ModelState::Unloaded);
    assert_eq!(f.loader.live_handles(), 0);
}

#[test]
fn test_close_twice_is_harmless() {
    let f = Fixture::new();
    f.model_manager.load_model(POTATO);

    f.model_manager.close();
    f.model_manager.close();

    assert_eq!(f.model_manager.state(), ModelState::Unloaded);
    assert_eq!(f.loader.live_handles(), 0);
    assert!(f.model_manager.classify(&healthy_leaf()).is_empty());
}

#[test]
fn test_swapping_models_never_holds_two_handles() {
    let f = Fixture::new();

    for _ in 0..5 {
        f.model_manager.load_model(TOMATO);
        f.model_manager.load_model(POTATO);
    }

    assert_eq!(f.loader.peak_handles(), 1);
    assert_eq!(f.loader.live_handles(), 1);
    assert_eq!(
        f.model_manager.state(),
        ModelState::Loaded(POTATO.to_string())
    );
}

#[test]
fn test_classify_during_load_returns_empty() {
    let f = Fixture::with_load_delay(Duration::from_millis(300));
    let model_manager = f.model_manager.clone();

    let loading = std::thread::spawn(move || model_manager.load_model(TOMATO));
    std::thread::sleep(Duration::from_millis(100));

    assert!(f.model_manager.classify(&blighted_leaf()).is_empty());

    assert_eq!(
        loading.join().unwrap(),
        ModelState::Loaded(TOMATO.to_string())
    );
    assert!(!f.model_manager.classify(&blighted_leaf()).is_empty());
}

#[test]
fn test_classify_display_formats_label_and_score() {
    let f = Fixture::new();
    f.model_manager.load_model(TOMATO);

    let lines = f.model_manager.classify_display(&blighted_leaf());
    let first = f.model_manager.classify(&blighted_leaf())[0].clone();

    assert_eq!(lines[0], format!("{} - {}", first.label, first.confidence));
}
