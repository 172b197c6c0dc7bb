use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four screens of the checkout flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    #[default]
    Plans,
    PaymentMethod,
    PaymentDetails,
    Success,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Plans => "plans",
            Step::PaymentMethod => "payment-method",
            Step::PaymentDetails => "payment-details",
            Step::Success => "success",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A choice the customer may or may not have made yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

impl Selection {
    pub fn id(&self) -> Option<&str> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(id) => Some(id),
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id() == Some(id)
    }
}

/// Current position in the checkout flow.
///
/// Transitions only check the step graph; resolving ids against the catalog is
/// the controller's job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WizardState {
    pub step: Step,
    pub plan: Selection,
    pub method: Selection,
    pub processing: bool,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    fn expect_step(&self, expected: Step, action: &'static str) -> Result<()> {
        if self.step != expected {
            return Err(CheckoutError::InvalidTransition {
                step: self.step,
                action,
            });
        }
        Ok(())
    }

    fn expect_idle(&self) -> Result<()> {
        if self.processing {
            return Err(CheckoutError::PaymentInProgress);
        }
        Ok(())
    }

    /// `plans -> payment-method`
    pub fn choose_plan(&mut self, plan_id: &str) -> Result<()> {
        self.expect_step(Step::Plans, "choose a plan")?;
        self.plan = Selection::Selected(plan_id.to_string());
        self.step = Step::PaymentMethod;
        Ok(())
    }

    /// `payment-method -> payment-details`
    pub fn choose_method(&mut self, method_id: &str) -> Result<()> {
        self.expect_step(Step::PaymentMethod, "choose a payment method")?;
        self.method = Selection::Selected(method_id.to_string());
        self.step = Step::PaymentDetails;
        Ok(())
    }

    /// Steps back one screen. Selections made so far are kept.
    pub fn back(&mut self) -> Result<()> {
        self.expect_idle()?;
        self.step = match self.step {
            Step::PaymentMethod => Step::Plans,
            Step::PaymentDetails => Step::PaymentMethod,
            step @ (Step::Plans | Step::Success) => {
                return Err(CheckoutError::InvalidTransition {
                    step,
                    action: "go back",
                });
            }
        };
        Ok(())
    }

    /// Marks a submission as started and returns the selected plan and method ids.
    pub fn begin_payment(&mut self) -> Result<(String, String)> {
        self.expect_step(Step::PaymentDetails, "submit a payment")?;
        self.expect_idle()?;
        let (Selection::Selected(plan), Selection::Selected(method)) = (&self.plan, &self.method)
        else {
            return Err(CheckoutError::InvalidTransition {
                step: self.step,
                action: "submit without a plan and payment method",
            });
        };
        let ids = (plan.clone(), method.clone());
        self.processing = true;
        Ok(ids)
    }

    /// Ends a submission; only a successful one advances to `success`.
    pub fn finish_payment(&mut self, succeeded: bool) {
        self.processing = false;
        if succeeded {
            self.step = Step::Success;
        }
    }

    /// `success -> plans`, clearing both selections.
    pub fn reset(&mut self) -> Result<()> {
        self.expect_step(Step::Success, "reset")?;
        *self = Self::new();
        Ok(())
    }
}
