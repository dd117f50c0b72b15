//! Signup flow use case
//!
//! Wraps the [`SignupWizard`] state machine with the calls a step screen
//! makes: local validation, server-side checks and the payment hand-off.
//! Navigation itself stays a silent no-op when not allowed.

use std::sync::Arc;

use boulders_core::ports::{ClockPort, SignupApiError, SignupApiPort};
use boulders_core::signup::validation::{
    validate_payment, validate_personal_info, validate_review,
};
use boulders_core::signup::{
    validate_step, AddonProduct, AddonSelections, DraftUpdate, MembershipPlan,
    MembershipSelection, PaymentInfo, PaymentMethod, PersonalInfo, SelectionError, SignupWizard,
    Step, ValidationErrors, WizardEvent,
};
use thiserror::Error;
use tracing::{debug, info, info_span, Instrument};

#[derive(Debug, Error)]
pub enum SignupFlowError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Api(#[from] SignupApiError),

    #[error("action requires the {expected} step, wizard is on {actual}")]
    WrongStep { expected: Step, actual: Step },
}

pub struct SignupFlow {
    wizard: SignupWizard,
    api: Arc<dyn SignupApiPort>,
    clock: Arc<dyn ClockPort>,
}

impl SignupFlow {
    pub fn new(api: Arc<dyn SignupApiPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            wizard: SignupWizard::new(),
            api,
            clock,
        }
    }

    pub fn wizard(&self) -> &SignupWizard {
        &self.wizard
    }

    pub fn apply(&mut self, event: WizardEvent) -> bool {
        self.wizard.apply(event)
    }

    pub async fn membership_plans(&self) -> Result<Vec<MembershipPlan>, SignupFlowError> {
        Ok(self.api.membership_plans().await?)
    }

    pub async fn addons(&self) -> Result<Vec<AddonProduct>, SignupFlowError> {
        Ok(self.api.addons().await?)
    }

    /// Start over with `plan` already chosen, e.g. from a landing page link.
    /// The wizard stays on the first step.
    pub fn start_with_plan(
        &mut self,
        plan: &MembershipPlan,
        quantity: u32,
    ) -> Result<(), SignupFlowError> {
        let selection = MembershipSelection::for_plan(plan, quantity)?;
        self.wizard.reset_draft();
        self.wizard.update_draft(DraftUpdate::membership(selection));
        self.wizard.mark_step_completed(Step::Membership);
        info!(plan_id = %plan.id, "signup started with preselected plan");
        Ok(())
    }

    pub fn select_plan(&mut self, plan: &MembershipPlan, quantity: u32) -> Result<(), SignupFlowError> {
        let selection = MembershipSelection::for_plan(plan, quantity)?;
        debug!(plan_id = %plan.id, total = selection.total_price, "membership selected");
        self.wizard.update_draft(DraftUpdate::membership(selection));
        Ok(())
    }

    /// Returns whether `addon` is selected afterwards.
    pub fn toggle_addon(&mut self, addon: &AddonProduct) -> bool {
        let mut addons = self.current_addons();
        let selected = addons.toggle(addon);
        self.wizard.update_draft(DraftUpdate::addons(addons));
        selected
    }

    pub fn set_addon_quantity(&mut self, id: &str, quantity: u32) -> Result<(), SignupFlowError> {
        let mut addons = self.current_addons();
        addons.set_quantity(id, quantity)?;
        self.wizard.update_draft(DraftUpdate::addons(addons));
        Ok(())
    }

    /// Validate locally, then with the server, then store the details and
    /// move on to the membership step.
    pub async fn submit_personal_info(&mut self, info: PersonalInfo) -> Result<(), SignupFlowError> {
        let span = info_span!("usecase.signup_flow.submit_personal_info");

        async {
            validate_personal_info(&info, self.clock.today())?;
            self.api.validate_personal_info(&info).await?;
            self.wizard.update_draft(DraftUpdate::personal_info(info));
            if self.wizard.current_step() == Step::Personal {
                self.wizard.next_step();
            }
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Advance once the current step's schema accepts the draft. Returns
    /// `false` on the last step.
    pub fn continue_to_next(&mut self) -> Result<bool, SignupFlowError> {
        validate_step(self.wizard.current_step(), self.wizard.draft(), self.clock.today())?;
        Ok(self.wizard.next_step())
    }

    /// Create the order and return the hosted checkout URL to navigate to.
    ///
    /// Only valid on the payment step with a complete draft. On success the
    /// draft records the payment and the wizard moves to the success step.
    pub async fn finalize_payment(&mut self, method: PaymentMethod) -> Result<String, SignupFlowError> {
        let span = info_span!("usecase.signup_flow.finalize_payment", method = method.as_str());

        async {
            let actual = self.wizard.current_step();
            if actual != Step::Payment {
                return Err(SignupFlowError::WrongStep {
                    expected: Step::Payment,
                    actual,
                });
            }
            validate_review(self.wizard.draft(), self.clock.today())?;

            let redirect = self.api.finalize_payment(self.wizard.draft(), method).await?;
            let payment = PaymentInfo {
                method,
                redirect_url: Some(redirect.redirect_url.clone()),
            };
            validate_payment(&payment)?;

            self.wizard.update_draft(DraftUpdate::payment(payment));
            self.wizard.next_step();
            info!(order_id = ?redirect.order_id, "payment finalized, redirecting to checkout");
            Ok(redirect.redirect_url)
        }
        .instrument(span)
        .await
    }

    fn current_addons(&self) -> AddonSelections {
        self.wizard.draft().addons.clone().unwrap_or_default()
    }
}
