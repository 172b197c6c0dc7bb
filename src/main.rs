use checkout_wizard::application::checkout::CheckoutController;
use checkout_wizard::config::{CheckoutConfig, Cli};
use checkout_wizard::domain::ports::{NotifierBox, PaymentGatewayBox};
use checkout_wizard::infrastructure::notifier::{FanoutNotifier, InMemoryNotifier, LogNotifier};
use checkout_wizard::infrastructure::simulated::SimulatedGateway;
use checkout_wizard::interfaces::terminal::session::Session;
use checkout_wizard::logger::setup_logger;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CheckoutConfig::from_cli(cli).into_diagnostic()?;
    setup_logger(config.log_level).into_diagnostic()?;

    let gateway: PaymentGatewayBox = match config.decline_reason {
        Some(reason) => {
            log::warn!("Simulated gateway will decline every payment: {}", reason);
            Box::new(SimulatedGateway::declining(config.gateway_delay, reason))
        }
        None => Box::new(SimulatedGateway::new(config.gateway_delay)),
    };

    // The session prints toasts from the inbox; the log gets a copy.
    let inbox = InMemoryNotifier::new();
    let notifier: NotifierBox = Box::new(FanoutNotifier::new(vec![
        Box::new(inbox.clone()),
        Box::new(LogNotifier),
    ]));

    let controller = CheckoutController::new(config.catalog, gateway, notifier)
        .with_discount(config.discount)
        .with_payment_timeout(config.payment_timeout);

    let mut session = Session::new(&controller, inbox, io::stdout());
    session
        .run(BufReader::new(tokio::io::stdin()))
        .await
        .into_diagnostic()?;

    Ok(())
}
