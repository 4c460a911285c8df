#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crop {
    pub name: String,
    pub icon: String,
    pub model_name: String,
}

impl Crop {
    pub fn new(name: &str) -> Self {
        let mut title = name.to_string();
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self {
            name: name.to_string(),
            icon: format!("icons/{}.png", name),
            model_name: format!("{}_model_unquant.tflite", title),
        }
    }
}

pub fn catalog() -> Vec<Crop> {
    ["apple", "tomato", "potato", "mango", "guava", "cotton"]
        .into_iter()
        .map(Crop::new)
        .collect()
}
