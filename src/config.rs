//! Command-line and environment configuration.

use crate::domain::catalog::Catalog;
use crate::domain::money::Discount;
use crate::error::{CheckoutError, Result};
use clap::Parser;
use log::LevelFilter;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive subscription checkout", long_about = None)]
pub struct Cli {
    /// JSON file with the plans and payment methods to offer (defaults to the built-in catalog)
    #[arg(long, env = "CHECKOUT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// How long the simulated gateway takes to answer, in milliseconds
    #[arg(long, env = "CHECKOUT_DELAY_MS", default_value_t = 2000)]
    pub delay_ms: u64,

    /// Give up on the gateway after this many milliseconds
    #[arg(long, env = "CHECKOUT_TIMEOUT_MS", default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Discount subtracted from the plan price at checkout
    #[arg(long, env = "CHECKOUT_DISCOUNT", default_value = "5.00")]
    pub discount: Decimal,

    /// Label shown next to the discount
    #[arg(long, env = "CHECKOUT_DISCOUNT_LABEL", default_value = "First month discount")]
    pub discount_label: String,

    /// Do not apply any discount
    #[arg(long, conflicts_with = "discount")]
    pub no_discount: bool,

    /// Make the simulated gateway decline every payment with this reason
    #[arg(long, env = "CHECKOUT_DECLINE")]
    pub decline: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Resolved settings for one checkout run.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub catalog: Catalog,
    pub discount: Option<Discount>,
    pub gateway_delay: Duration,
    pub payment_timeout: Duration,
    pub decline_reason: Option<String>,
    pub log_level: LevelFilter,
}

impl CheckoutConfig {
    /// Builds the settings, reading the catalog file if one was given.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let catalog = match &cli.catalog {
            Some(path) => Catalog::from_reader(BufReader::new(File::open(path)?))?,
            None => Catalog::default(),
        };
        if cli.discount < Decimal::ZERO || cli.discount.scale() > 2 {
            return Err(CheckoutError::InvalidDiscount(cli.discount));
        }
        let discount = (!cli.no_discount && !cli.discount.is_zero())
            .then(|| Discount::new(cli.discount, cli.discount_label));

        Ok(Self {
            catalog,
            discount,
            gateway_delay: Duration::from_millis(cli.delay_ms),
            payment_timeout: Duration::from_millis(cli.timeout_ms),
            decline_reason: cli.decline,
            log_level: crate::logger::level_for(cli.verbose),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["checkout-wizard"]).unwrap();
        let config = CheckoutConfig::from_cli(cli).unwrap();
        assert_eq!(config.catalog, Catalog::default());
        assert_eq!(config.discount, Some(Discount::default()));
        assert_eq!(config.payment_timeout, Duration::from_secs(30));
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert!(config.decline_reason.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "checkout-wizard",
            "--delay-ms",
            "0",
            "--discount",
            "2.50",
            "--discount-label",
            "Spring sale",
            "--decline",
            "card blocked",
            "-vv",
        ])
        .unwrap();
        let config = CheckoutConfig::from_cli(cli).unwrap();
        let discount = config.discount.unwrap();
        assert_eq!(discount.amount, Money::new(dec!(2.50)));
        assert_eq!(discount.description, "Spring sale");
        assert_eq!(config.gateway_delay, Duration::ZERO);
        assert_eq!(config.decline_reason.as_deref(), Some("card blocked"));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_no_discount() {
        let cli = Cli::try_parse_from(["checkout-wizard", "--no-discount"]).unwrap();
        assert!(CheckoutConfig::from_cli(cli).unwrap().discount.is_none());
    }

    #[test]
    fn test_rejects_negative_or_fractional_cent_discount() {
        for value in ["--discount=-10", "--discount=0.005"] {
            let cli = Cli::try_parse_from(["checkout-wizard", value]).unwrap();
            assert!(matches!(
                CheckoutConfig::from_cli(cli),
                Err(CheckoutError::InvalidDiscount(_))
            ));
        }
    }

    #[test]
    fn test_missing_catalog_file() {
        let cli =
            Cli::try_parse_from(["checkout-wizard", "--catalog", "/nonexistent/catalog.json"])
                .unwrap();
        assert!(CheckoutConfig::from_cli(cli).is_err());
    }
}
