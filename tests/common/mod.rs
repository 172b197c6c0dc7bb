#![allow(dead_code)]

use async_trait::async_trait;
use checkout_wizard::application::checkout::CheckoutController;
use checkout_wizard::domain::card::CardData;
use checkout_wizard::domain::catalog::Catalog;
use checkout_wizard::domain::ports::{
    PaymentFailure, PaymentGateway, PaymentReceipt, PaymentRequest,
};
use checkout_wizard::infrastructure::notifier::InMemoryNotifier;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A gateway that records every request and answers from a script of outcomes.
///
/// Once the script runs out every payment is approved.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    delay: Duration,
    outcomes: Arc<Mutex<VecDeque<Result<PaymentReceipt, PaymentFailure>>>>,
    requests: Arc<Mutex<Vec<PaymentRequest>>>,
}

impl ScriptedGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn then(self, outcome: Result<PaymentReceipt, PaymentFailure>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn submit(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentFailure> {
        self.requests.lock().unwrap().push(request);
        tokio::time::sleep(self.delay).await;
        let next = self.outcomes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Ok(PaymentReceipt {
                reference: "TEST-APPROVED".to_string(),
            })
        })
    }
}

pub fn controller_with(gateway: ScriptedGateway) -> (CheckoutController, InMemoryNotifier) {
    let notifier = InMemoryNotifier::new();
    let controller = CheckoutController::new(
        Catalog::default(),
        Box::new(gateway),
        Box::new(notifier.clone()),
    );
    (controller, notifier)
}

pub fn valid_card() -> CardData {
    CardData {
        cardholder_name: "John Doe".to_string(),
        card_number: "4111 1111 1111 1111".to_string(),
        expiry_month: "12".to_string(),
        expiry_year: "99".to_string(),
        cvv: "123".to_string(),
    }
}

/// Input lines for a full card checkout of `plan`.
pub fn card_checkout_script(plan: &str) -> String {
    [
        plan,
        "credit-card",
        "name John Doe",
        "number 4111111111111111",
        "month 12",
        "year 99",
        "cvv 123",
        "pay",
        "",
    ]
    .join("\n")
}
