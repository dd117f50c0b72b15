//! Signup domain module.
//!
//! Step order, the draft record, product selections, validation schemas and
//! the wizard state machine that ties them together.

pub mod catalog;
pub mod draft;
pub mod selection;
pub mod step;
pub mod validation;
pub mod wizard;

pub use catalog::{AddonProduct, MembershipKind, MembershipPlan};
pub use draft::{DraftUpdate, PaymentInfo, PaymentMethod, PersonalInfo, SignupDraft};
pub use selection::{AddonSelection, AddonSelections, MembershipSelection, SelectionError};
pub use step::{Step, StepStatus};
pub use validation::{validate_step, FieldError, ValidationErrors};
pub use wizard::{RouteResolution, SignupWizard, WizardEvent};
