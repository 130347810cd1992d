//! Timeline step edits. Steps always stay numbered 1..N.

use playkit_core::{AppEvent, DesignerError, DiagramEvent};

use super::DesignerState;
use crate::model::TimingStep;

impl DesignerState {
    /// Appends a step. Returns its number.
    pub fn add_timing_step(&mut self, description: impl Into<String>) -> u32 {
        let step = self.diagram.timing.len() as u32 + 1;
        self.diagram
            .timing
            .push(TimingStep::new(step, description));
        self.timing_changed();
        step
    }

    /// Removes step `step` and renumbers the rest.
    ///
    /// The last remaining step is never removed; that request returns
    /// `Ok(false)`.
    pub fn remove_timing_step(&mut self, step: u32) -> Result<bool, DesignerError> {
        let index = self.step_index(step)?;
        if self.diagram.timing.len() == 1 {
            tracing::debug!("Refusing to remove the only timing step");
            return Ok(false);
        }
        self.diagram.timing.remove(index);
        self.diagram.renumber_timing();
        self.timing_changed();
        Ok(true)
    }

    /// Rewrites a step's description and, when given, its event tags.
    pub fn update_timing_step(
        &mut self,
        step: u32,
        description: impl Into<String>,
        events: Option<Vec<String>>,
    ) -> Result<(), DesignerError> {
        let index = self.step_index(step)?;
        let entry = &mut self.diagram.timing[index];
        entry.description = description.into();
        if let Some(events) = events {
            entry.events = events;
        }
        self.timing_changed();
        Ok(())
    }

    fn step_index(&self, step: u32) -> Result<usize, DesignerError> {
        let total = self.diagram.timing.len();
        if step == 0 || step as usize > total {
            return Err(DesignerError::InvalidTimingStep {
                step: step as usize,
                total,
            });
        }
        Ok(step as usize - 1)
    }

    fn timing_changed(&mut self) {
        self.mark_modified();
        self.publish(AppEvent::Diagram(DiagramEvent::TimingChanged {
            steps: self.diagram.timing.len(),
        }));
    }
}
