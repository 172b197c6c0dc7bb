use crate::domain::card::{CardData, CardField, FieldError, ValidationErrors};
use crate::domain::catalog::{Catalog, MethodKind, PaymentMethod, PricingPlan};
use crate::domain::money::Discount;
use crate::domain::ports::{
    Instrument, Notification, NotifierBox, PaymentFailure, PaymentGatewayBox, PaymentReceipt,
    PaymentRequest,
};
use crate::domain::summary::OrderSummary;
use crate::domain::wizard::WizardState;
use crate::error::{CheckoutError, Result};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

pub const DEFAULT_PAYMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// What the payment-details step hands to [`CheckoutController::submit`].
#[derive(Debug, Clone)]
pub enum PaymentDetails {
    Card(CardData),
    /// Hosted methods carry no details of their own.
    Hosted,
}

/// Drives the checkout wizard.
///
/// `CheckoutController` owns the wizard state and is the only thing that mutates
/// it. Views report selections by id and the controller resolves them against the
/// catalog. The state lock is never held across an await, so the state stays
/// readable (and a second submit is refused) while a payment is in flight.
pub struct CheckoutController {
    catalog: Catalog,
    gateway: PaymentGatewayBox,
    notifier: NotifierBox,
    discount: Option<Discount>,
    payment_timeout: Duration,
    state: RwLock<WizardState>,
}

impl CheckoutController {
    /// Creates a controller positioned on the plans step.
    ///
    /// The default first-month discount applies until [`with_discount`](Self::with_discount)
    /// replaces it.
    pub fn new(catalog: Catalog, gateway: PaymentGatewayBox, notifier: NotifierBox) -> Self {
        Self {
            catalog,
            gateway,
            notifier,
            discount: Some(Discount::default()),
            payment_timeout: DEFAULT_PAYMENT_TIMEOUT,
            state: RwLock::new(WizardState::new()),
        }
    }

    pub fn with_discount(mut self, discount: Option<Discount>) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_payment_timeout(mut self, timeout: Duration) -> Self {
        self.payment_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A snapshot of the current wizard state.
    pub async fn state(&self) -> WizardState {
        self.read_state().clone()
    }

    pub async fn selected_plan(&self) -> Option<&PricingPlan> {
        let state = self.read_state();
        state.plan.id().and_then(|id| self.catalog.plan(id))
    }

    pub async fn selected_method(&self) -> Option<&PaymentMethod> {
        let state = self.read_state();
        state.method.id().and_then(|id| self.catalog.method(id))
    }

    /// The order summary, once both a plan and a method are selected.
    pub async fn summary(&self) -> Option<OrderSummary> {
        let plan = self.selected_plan().await?;
        let method = self.selected_method().await?;
        Some(OrderSummary::new(plan, method, self.discount.as_ref()))
    }

    pub async fn select_plan(&self, plan_id: &str) -> Result<()> {
        if self.catalog.plan(plan_id).is_none() {
            return Err(CheckoutError::UnknownPlan(plan_id.to_string()));
        }
        self.write_state().choose_plan(plan_id)?;
        info!("Plan '{}' selected", plan_id);
        Ok(())
    }

    pub async fn select_method(&self, method_id: &str) -> Result<()> {
        if self.catalog.method(method_id).is_none() {
            return Err(CheckoutError::UnknownMethod(method_id.to_string()));
        }
        self.write_state().choose_method(method_id)?;
        info!("Payment method '{}' selected", method_id);
        Ok(())
    }

    pub async fn back(&self) -> Result<()> {
        let mut state = self.write_state();
        state.back()?;
        debug!("Moved back to step '{}'", state.step);
        Ok(())
    }

    /// Returns to the plans step with both selections cleared.
    pub async fn reset(&self) -> Result<()> {
        self.write_state().reset()?;
        info!("Checkout reset");
        Ok(())
    }

    /// Submits the payment for the selected plan and method.
    ///
    /// Card details are validated first; invalid details never reach the gateway.
    /// On success the wizard moves to the success step. On any failure it stays on
    /// the payment-details step so the customer can correct the data and retry.
    /// Either way exactly one notification is published and the processing flag is
    /// cleared before this returns. Dropping the returned future before it
    /// completes counts as a failed submission.
    pub async fn submit(&self, details: PaymentDetails) -> Result<PaymentReceipt> {
        let (plan_id, method_id) = self.write_state().begin_payment()?;
        let pending = PendingPayment {
            controller: self,
            armed: true,
        };
        info!("Submitting payment for plan '{}' via '{}'", plan_id, method_id);

        let outcome = self.process_payment(&plan_id, &method_id, details).await;
        pending.finish(outcome.is_ok());

        match outcome {
            Ok(receipt) => {
                info!("Payment approved, reference {}", receipt.reference);
                self.notifier.notify(Notification::payment_succeeded());
                Ok(receipt)
            }
            Err(err) => {
                warn!("Payment not completed: {}", err);
                let notification = match &err {
                    CheckoutError::ValidationError(errors) => Notification::invalid_details(errors),
                    _ => Notification::payment_failed(),
                };
                self.notifier.notify(notification);
                Err(err)
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, WizardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, WizardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn process_payment(
        &self,
        plan_id: &str,
        method_id: &str,
        details: PaymentDetails,
    ) -> Result<PaymentReceipt> {
        let plan = self
            .catalog
            .plan(plan_id)
            .ok_or_else(|| CheckoutError::UnknownPlan(plan_id.to_string()))?;
        let method = self
            .catalog
            .method(method_id)
            .ok_or_else(|| CheckoutError::UnknownMethod(method_id.to_string()))?;

        let instrument = match (method.kind, details) {
            (MethodKind::Card, PaymentDetails::Card(card)) => {
                Instrument::Card(card.validate(today())?)
            }
            (MethodKind::Card, PaymentDetails::Hosted) => {
                return Err(ValidationErrors(vec![FieldError::new(
                    CardField::CardNumber,
                    "is required",
                )])
                .into());
            }
            (MethodKind::Hosted, _) => Instrument::Hosted,
        };

        let summary = OrderSummary::new(plan, method, self.discount.as_ref());
        let request = PaymentRequest {
            plan_id: plan.id.clone(),
            method_id: method.id.clone(),
            amount: summary.total,
            currency: summary.currency,
            instrument,
        };
        debug!("Gateway request: {:?}", request);

        match tokio::time::timeout(self.payment_timeout, self.gateway.submit(request)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(PaymentFailure::Timeout.into()),
        }
    }
}

/// A submission between `begin_payment` and `finish_payment`.
///
/// If the submit future is dropped mid-flight the guard ends the payment as a
/// failure, so the wizard never stays stuck in `processing`.
struct PendingPayment<'a> {
    controller: &'a CheckoutController,
    armed: bool,
}

impl PendingPayment<'_> {
    fn finish(mut self, succeeded: bool) {
        self.armed = false;
        self.controller.write_state().finish_payment(succeeded);
    }
}

impl Drop for PendingPayment<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("Payment submission cancelled before the gateway answered");
        self.controller.write_state().finish_payment(false);
        self.controller.notifier.notify(Notification::payment_failed());
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
