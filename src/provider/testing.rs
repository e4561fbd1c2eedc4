use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::activity::{ActivityInput, ActivityKind};
use crate::provider::{CarbonMassKg, EstimateProvider, ProviderError};

/// Answers with a fixed mass per activity kind and fails for kinds it has no answer for.
/// Records every activity it was asked about.
#[derive(Default)]
pub struct ScriptedProvider {
    answers: HashMap<ActivityKind, CarbonMassKg>,
    calls: Mutex<Vec<ActivityInput>>,
}

impl ScriptedProvider {
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn answering(answers: &[(ActivityKind, CarbonMassKg)]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ActivityInput> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl EstimateProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn estimate(&self, activity: &ActivityInput) -> Result<CarbonMassKg, ProviderError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(activity.clone());
        self.answers
            .get(&activity.kind())
            .copied()
            .ok_or_else(|| ProviderError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
    }
}
