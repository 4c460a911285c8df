use crate::image_classifier::interface::ImageClassifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelState {
    Unloaded,
    Loaded(String),
}

/// Owns at most one classifier handle. Installing always releases the previous handle first,
/// and releasing drops it, so a handle can neither leak nor be used after release.
#[derive(Default)]
pub enum ClassifierSlot {
    #[default]
    Unloaded,
    Loaded {
        model_name: String,
        classifier: Box<dyn ImageClassifier + Send + Sync>,
    },
}

impl ClassifierSlot {
    /// Drops the held handle. Returns the name of the model that was released, if any.
    pub fn release(&mut self) -> Option<String> {
        match std::mem::take(self) {
            ClassifierSlot::Unloaded => None,
            ClassifierSlot::Loaded {
                model_name,
                classifier,
            } => {
                drop(classifier);
                Some(model_name)
            }
        }
    }

    pub fn install(&mut self, model_name: String, classifier: Box<dyn ImageClassifier + Send + Sync>) {
        self.release();
        *self = ClassifierSlot::Loaded {
            model_name,
            classifier,
        };
    }

    pub fn classifier(&self) -> Option<&(dyn ImageClassifier + Send + Sync)> {
        match self {
            ClassifierSlot::Unloaded => None,
            ClassifierSlot::Loaded { classifier, .. } => Some(classifier.as_ref()),
        }
    }

    pub fn state(&self) -> ModelState {
        match self {
            ClassifierSlot::Unloaded => ModelState::Unloaded,
            ClassifierSlot::Loaded { model_name, .. } => ModelState::Loaded(model_name.clone()),
        }
    }
}
