mod common;

use checkout_wizard::application::checkout::PaymentDetails;
use checkout_wizard::domain::card::format_card_number;
use checkout_wizard::domain::money::Money;
use checkout_wizard::domain::ports::{Instrument, Notification};
use checkout_wizard::domain::wizard::{Selection, Step};
use checkout_wizard::error::CheckoutError;
use common::{ScriptedGateway, controller_with, valid_card};
use rust_decimal_macros::dec;
use std::time::Duration;

#[test]
fn test_card_number_formatting_examples() {
    assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
    assert_eq!(format_card_number("abc123"), "123");
    assert_eq!(format_card_number(""), "");
    assert_eq!(format_card_number("4111 1111"), "4111 1111");

    let once = format_card_number("4111-1111-1111-1111");
    assert_eq!(format_card_number(&once), once);
}

#[tokio::test]
async fn test_full_card_checkout() {
    let gateway = ScriptedGateway::new(Duration::ZERO);
    let (controller, notifier) = controller_with(gateway.clone());

    let state = controller.state().await;
    assert_eq!(state.step, Step::Plans);

    controller.select_plan("pro").await.unwrap();
    let state = controller.state().await;
    assert_eq!(state.step, Step::PaymentMethod);
    assert_eq!(state.plan, Selection::Selected("pro".to_string()));

    controller.select_method("credit-card").await.unwrap();
    assert_eq!(controller.state().await.step, Step::PaymentDetails);

    let receipt = controller
        .submit(PaymentDetails::Card(valid_card()))
        .await
        .unwrap();
    assert_eq!(receipt.reference, "TEST-APPROVED");
    assert_eq!(controller.state().await.step, Step::Success);
    assert_eq!(notifier.drain(), vec![Notification::payment_succeeded()]);

    // The discounted total is what gets charged.
    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount, Money::new(dec!(24.99)));
    assert_eq!(requests[0].currency, "$");
    match &requests[0].instrument {
        Instrument::Card(card) => assert_eq!(card.last4(), "1111"),
        Instrument::Hosted => panic!("expected a card instrument"),
    }
}

#[tokio::test]
async fn test_reset_clears_both_selections() {
    let (controller, _) = controller_with(ScriptedGateway::new(Duration::ZERO));
    controller.select_plan("basic").await.unwrap();
    controller.select_method("razorpay").await.unwrap();
    controller.submit(PaymentDetails::Hosted).await.unwrap();

    controller.reset().await.unwrap();
    let state = controller.state().await;
    assert_eq!(state.step, Step::Plans);
    assert_eq!(state.plan, Selection::Unselected);
    assert_eq!(state.method, Selection::Unselected);
    assert!(!state.processing);
}

#[tokio::test]
async fn test_back_navigation_retains_selection() {
    let (controller, _) = controller_with(ScriptedGateway::new(Duration::ZERO));
    controller.select_plan("pro").await.unwrap();
    controller.back().await.unwrap();

    let state = controller.state().await;
    assert_eq!(state.step, Step::Plans);
    assert!(state.plan.is("pro"));

    // Choosing again replaces the retained selection.
    controller.select_plan("enterprise").await.unwrap();
    controller.select_method("paypal").await.unwrap();
    controller.back().await.unwrap();
    controller.select_method("credit-card").await.unwrap();

    let state = controller.state().await;
    assert!(state.plan.is("enterprise"));
    assert!(state.method.is("credit-card"));
    assert_eq!(
        controller.summary().await.unwrap().total,
        Money::new(dec!(94.99))
    );
}

#[tokio::test]
async fn test_success_only_offers_reset() {
    let (controller, _) = controller_with(ScriptedGateway::new(Duration::ZERO));
    controller.select_plan("pro").await.unwrap();
    controller.select_method("paypal").await.unwrap();
    controller.submit(PaymentDetails::Hosted).await.unwrap();

    assert!(matches!(
        controller.back().await,
        Err(CheckoutError::InvalidTransition { step: Step::Success, .. })
    ));
    assert!(matches!(
        controller.select_plan("basic").await,
        Err(CheckoutError::InvalidTransition { .. })
    ));
    assert!(matches!(
        controller.submit(PaymentDetails::Hosted).await,
        Err(CheckoutError::InvalidTransition { .. })
    ));
    assert_eq!(controller.state().await.step, Step::Success);
}

#[tokio::test]
async fn test_discount_arithmetic_on_summary() {
    let (controller, _) = controller_with(ScriptedGateway::new(Duration::ZERO));
    controller.select_plan("pro").await.unwrap();
    controller.select_method("credit-card").await.unwrap();

    let summary = controller.summary().await.unwrap();
    assert_eq!(summary.subtotal_display(), "$29.99");
    assert_eq!(summary.total_display(), "$24.99");
}
