use crate::domain::catalog::{BillingInterval, PaymentMethod, PricingPlan};
use crate::domain::money::{Discount, Money};
use serde::Serialize;

/// Figures shown next to the payment form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub plan_name: String,
    pub method_name: String,
    pub currency: String,
    pub interval: BillingInterval,
    pub subtotal: Money,
    pub discount: Option<Discount>,
    pub total: Money,
}

impl OrderSummary {
    /// The total never drops below zero, whatever the discount.
    pub fn new(plan: &PricingPlan, method: &PaymentMethod, discount: Option<&Discount>) -> Self {
        let discount_amount = discount.map(|d| d.amount).unwrap_or(Money::ZERO);
        let total = (plan.price - discount_amount).max(Money::ZERO);
        Self {
            plan_name: plan.name.clone(),
            method_name: method.name.clone(),
            currency: plan.currency.clone(),
            interval: plan.interval,
            subtotal: plan.price,
            discount: discount.cloned(),
            total,
        }
    }

    pub fn subtotal_display(&self) -> String {
        self.subtotal.display(&self.currency)
    }

    pub fn discount_display(&self) -> Option<String> {
        self.discount
            .as_ref()
            .map(|d| format!("-{}", d.amount.display(&self.currency)))
    }

    pub fn total_display(&self) -> String {
        self.total.display(&self.currency)
    }
}
