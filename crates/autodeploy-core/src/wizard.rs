//! Step counter for the three-screen onboarding wizard.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    BasicInfo,
    Features,
    Summary,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::BasicInfo => 1,
            WizardStep::Features => 2,
            WizardStep::Summary => 3,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Please fill out all fields before proceeding.")]
    MissingFields,
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: WizardStep,
    pub project_name: String,
    pub description: String,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Advance one step. Leaving the first step requires a project name and
    /// description. No-op on the last step.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.step = match self.step {
            WizardStep::BasicInfo => {
                if self.project_name.trim().is_empty() || self.description.trim().is_empty() {
                    return Err(WizardError::MissingFields);
                }
                WizardStep::Features
            }
            WizardStep::Features | WizardStep::Summary => WizardStep::Summary,
        };
        Ok(self.step)
    }

    /// Go back one step. No-op on the first step.
    pub fn previous(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::BasicInfo | WizardStep::Features => WizardStep::BasicInfo,
            WizardStep::Summary => WizardStep::Features,
        };
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.step == WizardStep::Summary
    }
}
