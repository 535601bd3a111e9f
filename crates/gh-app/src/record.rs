//! Recorded samples of a simulation run.

use std::collections::BTreeMap;

use gh_components::Outputs;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Component outputs at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub t: f64,
    pub step: usize,
    pub outputs: BTreeMap<String, Outputs>,
}

/// Decimated history of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimRecord {
    pub samples: Vec<Sample>,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn component_names(&self) -> Vec<String> {
        self.samples
            .first()
            .map(|s| s.outputs.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Extract `(t, value)` pairs of a scalar output.
    pub fn scalar_series(&self, component: &str, output: &str) -> AppResult<Vec<(f64, f64)>> {
        self.samples
            .iter()
            .map(|s| {
                let outputs = s
                    .outputs
                    .get(component)
                    .ok_or_else(|| AppError::UnknownComponent(component.to_string()))?;
                outputs.get_scalar(output).map(|v| (s.t, v)).ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "Component '{}' has no scalar output '{}'",
                        component, output
                    ))
                })
            })
            .collect()
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        if self.samples.last().map(|s| s.step) != Some(sample.step) {
            self.samples.push(sample);
        }
    }
}
