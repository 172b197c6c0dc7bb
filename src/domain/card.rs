use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 16;

/// Groups the digits of `input` into blocks of four, e.g. `"4111111111111111"`
/// becomes `"4111 1111 1111 1111"`.
///
/// Every non-digit is dropped first and at most the leading 16 digits are kept.
/// Fewer than four digits are returned ungrouped. The output is a fixed point:
/// formatting it again yields the same string.
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return digits.into_iter().collect();
    }

    digits[..digits.len().min(MAX_CARD_DIGITS)]
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    CardholderName,
    CardNumber,
    ExpiryMonth,
    ExpiryYear,
    Cvv,
}

impl CardField {
    pub fn label(&self) -> &'static str {
        match self {
            CardField::CardholderName => "Cardholder Name",
            CardField::CardNumber => "Card Number",
            CardField::ExpiryMonth => "Month",
            CardField::ExpiryYear => "Year",
            CardField::Cvv => "CVV",
        }
    }
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Card details as typed by the customer. Nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

impl CardData {
    /// Checks the fields before they are sent to a gateway.
    ///
    /// `today` decides whether the expiry date has passed; cards stay valid
    /// through the last day of their expiry month.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedCard, ValidationErrors> {
        let mut errors = Vec::new();

        let cardholder_name = self.cardholder_name.trim();
        if cardholder_name.is_empty() {
            errors.push(FieldError::new(CardField::CardholderName, "is required"));
        }

        let number: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if number.is_empty() {
            errors.push(FieldError::new(CardField::CardNumber, "is required"));
        } else if !number.chars().all(|c| c.is_ascii_digit()) {
            errors.push(FieldError::new(CardField::CardNumber, "must contain only digits"));
        } else if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&number.len()) {
            errors.push(FieldError::new(
                CardField::CardNumber,
                format!("must have {MIN_CARD_DIGITS} to {MAX_CARD_DIGITS} digits"),
            ));
        } else if !luhn_valid(&number) {
            errors.push(FieldError::new(CardField::CardNumber, "is not a valid card number"));
        }

        let month = match parse_digits(&self.expiry_month, 1, 2) {
            Some(m) if (1..=12).contains(&m) => Some(m),
            _ => {
                errors.push(FieldError::new(CardField::ExpiryMonth, "must be between 01 and 12"));
                None
            }
        };

        let year = match parse_digits(&self.expiry_year, 2, 2) {
            Some(y) => Some(2000 + y as i32),
            None => {
                errors.push(FieldError::new(CardField::ExpiryYear, "must be two digits (YY)"));
                None
            }
        };

        if let (Some(month), Some(year)) = (month, year)
            && (year, month) < (today.year(), today.month())
        {
            errors.push(FieldError::new(CardField::ExpiryYear, "card has expired"));
        }

        if parse_digits(&self.cvv, 3, 4).is_none() {
            errors.push(FieldError::new(CardField::Cvv, "must be 3 or 4 digits"));
        }

        match (month, year) {
            (Some(expiry_month), Some(expiry_year)) if errors.is_empty() => Ok(ValidatedCard {
                cardholder_name: cardholder_name.to_string(),
                number,
                expiry_month,
                expiry_year,
                cvv: self.cvv.clone(),
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Parses a string of `min..=max` ASCII digits.
fn parse_digits(value: &str, min: usize, max: usize) -> Option<u32> {
    let value = value.trim();
    if !(min..=max).contains(&value.len()) || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Card details that passed validation and may be handed to a gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedCard {
    pub cardholder_name: String,
    pub number: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cvv: String,
}

impl ValidatedCard {
    /// The last four digits, for receipts and logs.
    pub fn last4(&self) -> &str {
        &self.number[self.number.len().saturating_sub(4)..]
    }
}

// Keeps the PAN and CVV out of log output.
impl fmt::Debug for ValidatedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCard")
            .field("cardholder_name", &self.cardholder_name)
            .field("last4", &self.last4())
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CardField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: CardField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_error(&self, field: CardField) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn valid_card() -> CardData {
        CardData {
            cardholder_name: "John Doe".to_string(),
            card_number: "4111 1111 1111 1111".to_string(),
            expiry_month: "12".to_string(),
            expiry_year: "30".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_format_full_card_number() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_format_short_and_empty_input() {
        assert_eq!(format_card_number("abc123"), "123");
        assert_eq!(format_card_number(""), "");
        assert_eq!(format_card_number("no digits here"), "");
        assert_eq!(format_card_number("12345"), "1234 5");
    }

    #[test]
    fn test_format_already_formatted_input() {
        assert_eq!(format_card_number("4111 1111"), "4111 1111");
        assert_eq!(format_card_number("4111-1111-1111-1111"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_format_truncates_to_sixteen_digits() {
        assert_eq!(
            format_card_number("41111111111111112222"),
            "4111 1111 1111 1111"
        );
    }

    #[test]
    fn test_format_is_a_fixed_point() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let len = rng.gen_range(0..24);
            let input: String = (0..len)
                .map(|_| {
                    if rng.gen_bool(0.8) {
                        char::from(b'0' + rng.gen_range(0..10u8))
                    } else {
                        *[' ', '-', 'x', '/'].get(rng.gen_range(0..4usize)).unwrap()
                    }
                })
                .collect();
            let once = format_card_number(&input);
            assert_eq!(format_card_number(&once), once, "input: {input:?}");
            assert!(once.len() <= 19);
        }
    }

    #[test]
    fn test_validate_accepts_good_card() {
        let card = valid_card().validate(today()).unwrap();
        assert_eq!(card.number, "4111111111111111");
        assert_eq!(card.expiry_month, 12);
        assert_eq!(card.expiry_year, 2030);
        assert_eq!(card.last4(), "1111");
    }

    #[test]
    fn test_validate_reports_every_bad_field() {
        let errors = CardData::default().validate(today()).unwrap_err();
        for field in [
            CardField::CardholderName,
            CardField::CardNumber,
            CardField::ExpiryMonth,
            CardField::ExpiryYear,
            CardField::Cvv,
        ] {
            assert!(errors.has_error(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_validate_rejects_luhn_failure() {
        let mut card = valid_card();
        card.card_number = "4111 1111 1111 1112".to_string();
        let errors = card.validate(today()).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert!(errors.has_error(CardField::CardNumber));
    }

    #[test]
    fn test_validate_expiry_boundaries() {
        let mut card = valid_card();
        card.expiry_month = "10".to_string();
        card.expiry_year = "26".to_string();
        assert!(card.validate(today()).is_ok());

        card.expiry_month = "09".to_string();
        let errors = card.validate(today()).unwrap_err();
        assert!(errors.has_error(CardField::ExpiryYear));

        card.expiry_month = "13".to_string();
        let errors = card.validate(today()).unwrap_err();
        assert!(errors.has_error(CardField::ExpiryMonth));
    }

    #[test]
    fn test_validated_card_debug_hides_number() {
        let card = valid_card().validate(today()).unwrap();
        let debug = format!("{card:?}");
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("123"));
    }
}
