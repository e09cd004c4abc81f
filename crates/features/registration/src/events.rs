//! Wizard transitions published on the application event bus.

use crate::notification::Toast;
use crate::steps::WizardStep;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RegistrationEvent {
    StepChanged { from: WizardStep, to: WizardStep },
    /// Field keys that failed on `step`.
    ValidationFailed { step: WizardStep, fields: Vec<String> },
    DraftSaved { draft_id: String },
    Submitted { reference: String, store_name: String },
    Notification(Toast),
}
