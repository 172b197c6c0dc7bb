//! Plain-text renderings of the checkout screens.
//!
//! Cards are stateless: they are built from an entity plus an `is_selected` flag
//! and report a click by passing the entity id to a callback. Interpreting the id
//! is up to the caller.

use crate::domain::catalog::{PaymentMethod, PricingPlan};
use crate::domain::summary::OrderSummary;
use std::fmt;

/// Something the customer can pick by id.
pub trait Selectable {
    fn id(&self) -> &str;

    /// Reports a click to `on_select` with this card's id.
    fn click<R>(&self, on_select: impl FnOnce(&str) -> R) -> R {
        on_select(self.id())
    }
}

pub struct PlanCard<'a> {
    pub plan: &'a PricingPlan,
    pub position: usize,
    pub is_selected: bool,
}

impl Selectable for PlanCard<'_> {
    fn id(&self) -> &str {
        &self.plan.id
    }
}

impl fmt::Display for PlanCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;
        write!(f, "[{}] {}", self.position, plan.name)?;
        if plan.popular {
            write!(f, "  * Most Popular *")?;
        }
        if self.is_selected {
            write!(f, "  (selected)")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "    {}/{}",
            plan.price.display(&plan.currency),
            plan.interval.label()
        )?;
        writeln!(f, "    {}", plan.description)?;
        for feature in &plan.features {
            writeln!(f, "    ✓ {feature}")?;
        }
        writeln!(f, "    [ {} ]  -> type '{}' or '{}'", plan.button_label(), self.position, plan.id)
    }
}

pub struct MethodCard<'a> {
    pub method: &'a PaymentMethod,
    pub position: usize,
    pub is_selected: bool,
}

impl Selectable for MethodCard<'_> {
    fn id(&self) -> &str {
        &self.method.id
    }
}

impl fmt::Display for MethodCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.method;
        let marker = if self.is_selected { '>' } else { ' ' };
        write!(f, "{marker}[{}] {} - {}", self.position, method.name, method.description)?;
        if method.popular {
            write!(f, "  (Popular)")?;
        }
        writeln!(f)?;
        for feature in &method.features {
            writeln!(f, "    • {feature}")?;
        }
        Ok(())
    }
}

pub struct SummaryCard<'a> {
    pub summary: &'a OrderSummary,
}

impl fmt::Display for SummaryCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;
        writeln!(f, "Order Summary ({} billing)", s.interval.adjective())?;
        writeln!(f, "  {:<24}{}", "Plan", s.plan_name)?;
        writeln!(f, "  {:<24}{}", "Payment Method", s.method_name)?;
        writeln!(f, "  {:<24}{}", "Subtotal", s.subtotal_display())?;
        if let (Some(discount), Some(amount)) = (&s.discount, s.discount_display()) {
            writeln!(f, "  {:<24}{}", discount.description, amount)?;
        }
        writeln!(f, "  {}", "-".repeat(36))?;
        writeln!(f, "  {:<24}{}", "Total", s.total_display())?;
        writeln!(
            f,
            "  • Your subscription will automatically renew every {}",
            s.interval.label()
        )?;
        writeln!(f, "  • You can cancel anytime from your account settings")?;
        writeln!(f, "  • All payments are secured with industry-standard encryption")
    }
}

pub struct SuccessView<'a> {
    pub plan_name: Option<&'a str>,
}

impl fmt::Display for SuccessView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Payment Successful!")?;
        writeln!(
            f,
            "Welcome to {}! Your subscription is now active.",
            self.plan_name.unwrap_or("your plan")
        )?;
        writeln!(f)?;
        writeln!(f, "What's Next?")?;
        writeln!(f, "  • Check your email for the confirmation receipt")?;
        writeln!(f, "  • Access your new features in the dashboard")?;
        writeln!(f, "  • Set up your team and start collaborating")?;
        writeln!(f)?;
        writeln!(f, "[ Go to Dashboard ]  -> type 'dashboard'")
    }
}
