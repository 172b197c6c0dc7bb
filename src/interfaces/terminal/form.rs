use crate::domain::card::{CardData, CardField, format_card_number};
use crate::domain::catalog::PaymentMethod;
use std::fmt;

/// Maximum characters each field accepts; longer input is cut off.
fn max_len(field: CardField) -> Option<usize> {
    match field {
        CardField::CardholderName => None,
        CardField::CardNumber => Some(19),
        CardField::ExpiryMonth | CardField::ExpiryYear => Some(2),
        CardField::Cvv => Some(4),
    }
}

/// The card entry form.
///
/// Input is masked (length limits, card number grouping) but never validated
/// here. While `loading` is set the submit control is disabled.
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    data: CardData,
    loading: bool,
}

impl PaymentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &CardData {
        &self.data
    }

    /// Applies a keystroke-level edit to one field.
    pub fn input(&mut self, field: CardField, raw: &str) {
        let masked = match field {
            CardField::CardNumber => format_card_number(raw),
            _ => raw.to_string(),
        };
        let masked = match max_len(field) {
            Some(limit) => masked.chars().take(limit).collect(),
            None => masked,
        };

        let slot = match field {
            CardField::CardholderName => &mut self.data.cardholder_name,
            CardField::CardNumber => &mut self.data.card_number,
            CardField::ExpiryMonth => &mut self.data.expiry_month,
            CardField::ExpiryYear => &mut self.data.expiry_year,
            CardField::Cvv => &mut self.data.cvv,
        };
        *slot = masked;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Processing..."
        } else {
            "Complete Payment"
        }
    }

    /// Hands a copy of the entered data to `on_submit`.
    ///
    /// Returns `None` without calling it while the form is loading. The form
    /// keeps its data so a failed payment can be corrected and resubmitted.
    pub fn submit<R>(&self, on_submit: impl FnOnce(CardData) -> R) -> Option<R> {
        if self.loading {
            return None;
        }
        Some(on_submit(self.data.clone()))
    }
}

impl fmt::Display for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data;
        let cvv = "*".repeat(d.cvv.chars().count());
        writeln!(f, "Card Details (secured with 256-bit SSL encryption)")?;
        writeln!(f, "  {:<16}{}", "name", or_placeholder(&d.cardholder_name, "John Doe"))?;
        writeln!(
            f,
            "  {:<16}{}",
            "number",
            or_placeholder(&d.card_number, "1234 5678 9012 3456")
        )?;
        writeln!(f, "  {:<16}{}", "month", or_placeholder(&d.expiry_month, "MM"))?;
        writeln!(f, "  {:<16}{}", "year", or_placeholder(&d.expiry_year, "YY"))?;
        writeln!(f, "  {:<16}{}", "cvv", or_placeholder(&cvv, "123"))?;
        writeln!(f, "[ {} ]  -> type 'pay'", self.submit_label())
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        format!("<{placeholder}>")
    } else {
        value.to_string()
    }
}

/// The pay button shown for provider-hosted methods.
pub struct HostedPanel<'a> {
    pub method: &'a PaymentMethod,
    pub loading: bool,
}

impl HostedPanel<'_> {
    pub fn button_label(&self) -> String {
        if self.loading {
            "Processing...".to_string()
        } else {
            format!("Pay with {}", self.method.name)
        }
    }
}

impl fmt::Display for HostedPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Integration", self.method.name)?;
        writeln!(
            f,
            "  You will be handed over to {} to authorise the payment.",
            self.method.name
        )?;
        writeln!(f, "[ {} ]  -> type 'pay'", self.button_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Catalog;

    #[test]
    fn test_card_number_is_formatted_on_input() {
        let mut form = PaymentForm::new();
        form.input(CardField::CardNumber, "4111111111111111999");
        assert_eq!(form.data().card_number, "4111 1111 1111 1111");
    }

    #[test]
    fn test_length_masks() {
        let mut form = PaymentForm::new();
        form.input(CardField::ExpiryMonth, "123");
        form.input(CardField::ExpiryYear, "2031");
        form.input(CardField::Cvv, "123456");
        form.input(CardField::CardholderName, "A Very Long Cardholder Name Indeed");
        let data = form.data();
        assert_eq!(data.expiry_month, "12");
        assert_eq!(data.expiry_year, "20");
        assert_eq!(data.cvv, "1234");
        assert_eq!(data.cardholder_name, "A Very Long Cardholder Name Indeed");
    }

    #[test]
    fn test_submit_packages_fields() {
        let mut form = PaymentForm::new();
        form.input(CardField::CardholderName, "Jane Roe");
        form.input(CardField::Cvv, "999");

        let submitted = form.submit(|data| data).unwrap();
        assert_eq!(submitted.cardholder_name, "Jane Roe");
        assert_eq!(submitted.cvv, "999");
        assert_eq!(form.data(), &submitted);
    }

    #[test]
    fn test_submit_disabled_while_loading() {
        let mut form = PaymentForm::new();
        assert_eq!(form.submit_label(), "Complete Payment");

        form.set_loading(true);
        assert_eq!(form.submit_label(), "Processing...");
        assert!(form.submit(|_| ()).is_none());

        form.set_loading(false);
        assert!(form.submit(|_| ()).is_some());
    }

    #[test]
    fn test_form_rendering_masks_cvv() {
        let mut form = PaymentForm::new();
        form.input(CardField::Cvv, "321");
        let text = form.to_string();
        assert!(text.contains("***"));
        assert!(!text.contains("321"));
        assert!(text.contains("<MM>"));
    }

    #[test]
    fn test_hosted_panel_label() {
        let catalog = Catalog::default();
        let mut panel = HostedPanel {
            method: catalog.method("paypal").unwrap(),
            loading: false,
        };
        assert_eq!(panel.button_label(), "Pay with PayPal");
        panel.loading = true;
        assert_eq!(panel.button_label(), "Processing...");
    }
}
