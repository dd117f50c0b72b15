//! Signup wizard state machine.
//!
//! Owns the current step, the accumulated draft and the derived per-step
//! status list. Every operation is synchronous and runs to completion;
//! navigation that is not allowed is a silent no-op reported through the
//! boolean return value.

use serde::Serialize;
use tracing::debug;

use super::draft::{DraftUpdate, SignupDraft};
use super::step::{Step, StepStatus};

/// Inputs that drive the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Next,
    Prev,
    GoTo(Step),
    UpdateDraft(DraftUpdate),
    MarkCompleted(Step),
    Reset,
}

/// Where the routing layer should land for a requested URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteResolution {
    pub step: Step,
    /// The requested segment was unknown or inaccessible; the URL must be
    /// rewritten to `step`.
    pub redirect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupWizard {
    current: Step,
    draft: SignupDraft,
    steps: [StepStatus; 6],
}

impl Default for SignupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupWizard {
    pub fn new() -> Self {
        Self {
            current: Step::first(),
            draft: SignupDraft::default(),
            steps: StepStatus::initial_list(),
        }
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn draft(&self) -> &SignupDraft {
        &self.draft
    }

    pub fn steps(&self) -> &[StepStatus] {
        &self.steps
    }

    pub fn status(&self, step: Step) -> StepStatus {
        self.steps[step.index()]
    }

    pub fn apply(&mut self, event: WizardEvent) -> bool {
        match event {
            WizardEvent::Next => self.next_step(),
            WizardEvent::Prev => self.prev_step(),
            WizardEvent::GoTo(step) => self.set_current_step(step),
            WizardEvent::UpdateDraft(update) => {
                self.update_draft(update);
                true
            }
            WizardEvent::MarkCompleted(step) => {
                self.mark_step_completed(step);
                true
            }
            WizardEvent::Reset => {
                self.reset_draft();
                true
            }
        }
    }

    /// Move to `target` if it is accessible. Returns `false` (and changes
    /// nothing) otherwise.
    pub fn set_current_step(&mut self, target: Step) -> bool {
        if !self.is_step_accessible(target) {
            debug!(from = %self.current, to = %target, "signup step not accessible, staying put");
            return false;
        }
        self.move_to(target);
        true
    }

    /// Advance one step. Returns `false` on the last step.
    ///
    /// The step right after the current one is the only step ahead of
    /// `current` that can ever be entered.
    pub fn next_step(&mut self) -> bool {
        match self.current.next() {
            Some(next) => {
                self.move_to(next);
                true
            }
            None => false,
        }
    }

    /// Go back one step. Returns `false` on the first step.
    pub fn prev_step(&mut self) -> bool {
        match self.current.prev() {
            Some(prev) => self.set_current_step(prev),
            None => false,
        }
    }

    pub fn update_draft(&mut self, update: DraftUpdate) {
        self.draft.merge(update);
    }

    /// Clear the draft and return to the first step with a fresh status list.
    pub fn reset_draft(&mut self) {
        debug!(from = %self.current, "signup wizard reset");
        *self = Self::new();
    }

    /// Flag `step` completed without moving the current step.
    pub fn mark_step_completed(&mut self, step: Step) {
        self.steps[step.index()].is_completed = true;
    }

    pub fn is_step_accessible(&self, step: Step) -> bool {
        step.index() <= self.current.index()
    }

    /// Whether the draft holds what the current step requires. Derived from
    /// `(current, draft)` on every call.
    pub fn can_proceed_to_next(&self) -> bool {
        match self.current {
            Step::Personal => self.draft.personal_info.is_some(),
            Step::Membership => self.draft.membership.is_some(),
            Step::Addons | Step::Review => true,
            Step::Payment => self.draft.payment.is_some(),
            Step::Success => false,
        }
    }

    /// Resolve a URL segment to the step that should be shown, navigating
    /// there when it is accessible.
    pub fn resolve_route(&mut self, slug: &str) -> RouteResolution {
        match Step::from_slug(slug) {
            Some(step) if self.set_current_step(step) => RouteResolution {
                step,
                redirect: false,
            },
            _ => RouteResolution {
                step: self.current,
                redirect: true,
            },
        }
    }

    fn move_to(&mut self, target: Step) {
        let target_index = target.index();
        for status in self.steps.iter_mut() {
            let index = status.step.index();
            if index < target_index {
                status.is_completed = true;
            }
            status.is_active = index == target_index;
            status.is_accessible = index <= target_index;
        }
        debug!(from = %self.current, to = %target, "signup step changed");
        self.current = target;
    }
}
