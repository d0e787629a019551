//! Ordered transform pipeline.
//!
//! Each step implements [`TransformStep`] and is executed in insertion
//! order over the same record set. Order matters: the canonical pipeline is
//! dedup, then remap, then trim, and swapping remap and trim changes which
//! values match the mapping.
//!
//! # Example
//!
//! ```ignore
//! let pipeline = TransformPipeline::new()
//!     .add_step(Box::new(DedupStep::new(key_fn)))
//!     .add_step(Box::new(RemapStep::new("flag", mapping)))
//!     .add_step(Box::new(TrimStep));
//! let state = pipeline.execute(&mut records)?;
//! ```

use std::collections::BTreeMap;

use anyhow::Result;

use rowpipe_model::{Entity, RecordSet};

use crate::passes;

/// A single pass over the record set.
pub trait TransformStep<T: Entity>: Send + Sync {
    /// Apply this step, mutating the record set in place.
    fn apply(&self, records: &mut RecordSet<T>, state: &mut PipelineState<T>) -> Result<()>;

    /// Human-readable name for this step (for logging/debugging).
    fn step_name(&self) -> &str;
}

/// Mutable state shared across pipeline steps.
pub struct PipelineState<T> {
    /// Records removed by deduplication, in encounter order, for audit.
    pub duplicates: Vec<T>,
    /// Step execution log for debugging.
    pub executed_steps: Vec<String>,
}

impl<T> Default for PipelineState<T> {
    fn default() -> Self {
        Self {
            duplicates: Vec::new(),
            executed_steps: Vec::new(),
        }
    }
}

/// An ordered pipeline of transform steps over one entity type.
pub struct TransformPipeline<T: Entity> {
    steps: Vec<Box<dyn TransformStep<T>>>,
}

impl<T: Entity> Default for TransformPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> TransformPipeline<T> {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the end of the pipeline.
    pub fn add_step(mut self, step: Box<dyn TransformStep<T>>) -> Self {
        self.steps.push(step);
        self
    }

    /// Execute all steps in order, returning the accumulated state.
    pub fn execute(&self, records: &mut RecordSet<T>) -> Result<PipelineState<T>> {
        let mut state = PipelineState::default();
        for step in &self.steps {
            step.apply(records, &mut state)?;
            state.executed_steps.push(step.step_name().to_string());
        }
        Ok(state)
    }

    /// List step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.step_name()).collect()
    }
}

/// Deduplication keyed by a caller-supplied derivation over entity fields.
pub struct DedupStep<T> {
    key_fn: Box<dyn Fn(&T) -> String + Send + Sync>,
}

impl<T> DedupStep<T> {
    pub fn new(key_fn: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            key_fn: Box::new(key_fn),
        }
    }
}

impl<T: Entity> TransformStep<T> for DedupStep<T> {
    fn apply(&self, records: &mut RecordSet<T>, state: &mut PipelineState<T>) -> Result<()> {
        let (survivors, duplicates) = passes::dedup(std::mem::take(records), &self.key_fn);
        *records = survivors;
        state.duplicates.extend(duplicates);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "dedup"
    }
}

/// Value remap over one named text field.
pub struct RemapStep {
    field: String,
    mapping: BTreeMap<String, String>,
}

impl RemapStep {
    pub fn new(field: impl Into<String>, mapping: BTreeMap<String, String>) -> Self {
        Self {
            field: field.into(),
            mapping,
        }
    }
}

impl<T: Entity> TransformStep<T> for RemapStep {
    fn apply(&self, records: &mut RecordSet<T>, _state: &mut PipelineState<T>) -> Result<()> {
        passes::remap(records, &self.field, &self.mapping)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "remap"
    }
}

/// Whitespace trim over every text field.
pub struct TrimStep;

impl<T: Entity> TransformStep<T> for TrimStep {
    fn apply(&self, records: &mut RecordSet<T>, _state: &mut PipelineState<T>) -> Result<()> {
        passes::trim_text_fields(records)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "trim"
    }
}
