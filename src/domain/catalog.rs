use crate::domain::money::Money;
use crate::error::{CheckoutError, Result};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Month,
    Year,
}

impl BillingInterval {
    /// Period label, as in "$9.99/month".
    pub fn label(&self) -> &'static str {
        match self {
            BillingInterval::Month => "month",
            BillingInterval::Year => "year",
        }
    }

    /// Adjective form used for the billing badge, as in "monthly billing".
    pub fn adjective(&self) -> &'static str {
        match self {
            BillingInterval::Month => "monthly",
            BillingInterval::Year => "yearly",
        }
    }
}

/// A subscription plan offered on the first wizard step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub currency: String,
    pub interval: BillingInterval,
    pub description: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub button_text: Option<String>,
}

impl PricingPlan {
    pub fn button_label(&self) -> &str {
        self.button_text.as_deref().unwrap_or("Choose Plan")
    }
}

/// How the payment details for a method are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    /// Card details are entered in the payment form.
    Card,
    /// The provider collects the details on its own checkout (PayPal, Razorpay).
    Hosted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
    pub kind: MethodKind,
}

/// The read-only set of plans and payment methods the wizard offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    plans: Vec<PricingPlan>,
    methods: Vec<PaymentMethod>,
}

impl Catalog {
    /// Builds a catalog, rejecting empty lists, empty or duplicate ids and
    /// negative or sub-cent prices.
    pub fn new(plans: Vec<PricingPlan>, methods: Vec<PaymentMethod>) -> Result<Self> {
        let catalog = Self { plans, methods };
        catalog.check()?;
        Ok(catalog)
    }

    /// Reads a catalog from a JSON document shaped like `{"plans": [...], "methods": [...]}`.
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let catalog: Catalog = serde_json::from_reader(source)?;
        catalog.check()?;
        Ok(catalog)
    }

    fn check(&self) -> Result<()> {
        if self.plans.is_empty() {
            return Err(CheckoutError::CatalogError("no pricing plans".to_string()));
        }
        if self.methods.is_empty() {
            return Err(CheckoutError::CatalogError("no payment methods".to_string()));
        }

        if let Some(plan) = self.plans.iter().find(|p| p.id.trim().is_empty()) {
            return Err(CheckoutError::CatalogError(format!(
                "plan '{}' has an empty id",
                plan.name
            )));
        }
        if let Some(method) = self.methods.iter().find(|m| m.id.trim().is_empty()) {
            return Err(CheckoutError::CatalogError(format!(
                "payment method '{}' has an empty id",
                method.name
            )));
        }
        // Prices are charged exactly as displayed, so no fractions of a cent.
        if let Some(plan) = self
            .plans
            .iter()
            .find(|p| p.price < Money::ZERO || p.price.value().scale() > 2)
        {
            return Err(CheckoutError::CatalogError(format!(
                "plan '{}' has an invalid price {}",
                plan.id,
                plan.price.value()
            )));
        }

        let mut seen = HashSet::new();
        if let Some(plan) = self.plans.iter().find(|p| !seen.insert(p.id.as_str())) {
            return Err(CheckoutError::CatalogError(format!(
                "duplicate plan id '{}'",
                plan.id
            )));
        }
        let mut seen = HashSet::new();
        if let Some(method) = self.methods.iter().find(|m| !seen.insert(m.id.as_str())) {
            return Err(CheckoutError::CatalogError(format!(
                "duplicate payment method id '{}'",
                method.id
            )));
        }
        Ok(())
    }

    pub fn plans(&self) -> &[PricingPlan] {
        &self.plans
    }

    pub fn methods(&self) -> &[PaymentMethod] {
        &self.methods
    }

    pub fn plan(&self, id: &str) -> Option<&PricingPlan> {
        self.plans.iter().find(|plan| plan.id == id)
    }

    pub fn method(&self, id: &str) -> Option<&PaymentMethod> {
        self.methods.iter().find(|method| method.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            plans: default_plans(),
            methods: default_methods(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_plans() -> Vec<PricingPlan> {
    vec![
        PricingPlan {
            id: "basic".to_string(),
            name: "Basic".to_string(),
            price: Money::new(dec!(9.99)),
            currency: "$".to_string(),
            interval: BillingInterval::Month,
            description: "Perfect for individuals getting started".to_string(),
            features: strings(&[
                "Up to 5 projects",
                "Basic analytics",
                "Email support",
                "Mobile app access",
            ]),
            popular: false,
            button_text: Some("Start Basic".to_string()),
        },
        PricingPlan {
            id: "pro".to_string(),
            name: "Professional".to_string(),
            price: Money::new(dec!(29.99)),
            currency: "$".to_string(),
            interval: BillingInterval::Month,
            description: "Best for growing businesses".to_string(),
            features: strings(&[
                "Unlimited projects",
                "Advanced analytics",
                "Priority support",
                "API access",
                "Custom integrations",
                "Team collaboration",
            ]),
            popular: true,
            button_text: Some("Go Pro".to_string()),
        },
        PricingPlan {
            id: "enterprise".to_string(),
            name: "Enterprise".to_string(),
            price: Money::new(dec!(99.99)),
            currency: "$".to_string(),
            interval: BillingInterval::Month,
            description: "For large organizations".to_string(),
            features: strings(&[
                "Everything in Pro",
                "Dedicated account manager",
                "SLA guarantee",
                "Custom onboarding",
                "Advanced security",
                "Bulk user management",
            ]),
            popular: false,
            button_text: Some("Contact Sales".to_string()),
        },
    ]
}

fn default_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: "paypal".to_string(),
            name: "PayPal".to_string(),
            description: "Pay with your PayPal account".to_string(),
            icon: "credit-card".to_string(),
            features: strings(&["Instant processing", "Buyer protection", "Global coverage"]),
            popular: true,
            kind: MethodKind::Hosted,
        },
        PaymentMethod {
            id: "razorpay".to_string(),
            name: "Razorpay".to_string(),
            description: "Credit/Debit cards & UPI".to_string(),
            icon: "shield".to_string(),
            features: strings(&[
                "Multiple payment options",
                "Secure transactions",
                "Local support",
            ]),
            popular: false,
            kind: MethodKind::Hosted,
        },
        PaymentMethod {
            id: "credit-card".to_string(),
            name: "Credit Card".to_string(),
            description: "Direct card payment".to_string(),
            icon: "zap".to_string(),
            features: strings(&["Fast checkout", "Secure encryption", "24/7 support"]),
            popular: false,
            kind: MethodKind::Card,
        },
    ]
}
