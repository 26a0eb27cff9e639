use std::sync::{Arc, RwLock};

use tracing::info;

use crate::model::{
    prediction::predict_ids,
    structures::{fit_result::FittedModel, match_record::ContestantId}
};

/// Holds the model readers predict against. A fit builds a whole new model
/// and swaps it in, so readers see either the previous or the next model and
/// never a half-trained one.
#[derive(Debug, Default)]
pub struct ModelPublisher {
    current: RwLock<Arc<FittedModel>>
}

impl ModelPublisher {
    pub fn new(model: FittedModel) -> ModelPublisher {
        ModelPublisher {
            current: RwLock::new(Arc::new(model))
        }
    }

    pub fn publish(&self, model: FittedModel) {
        let contestants = model.ratings.len();
        let next = Arc::new(model);

        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next
        }

        info!("Published model covering {} contestants", contestants);
    }

    /// The latest published model. Cheap to clone and safe to hold across
    /// later publishes.
    pub fn snapshot(&self) -> Arc<FittedModel> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner())
        }
    }

    pub fn predict(&self, id_a: ContestantId, id_b: ContestantId) -> f64 {
        predict_ids(&self.snapshot().ratings, id_a, id_b)
    }
}
