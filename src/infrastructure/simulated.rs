use crate::domain::ports::{
    Instrument, PaymentFailure, PaymentGateway, PaymentReceipt, PaymentRequest,
};
use async_trait::async_trait;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_secs(2);

/// A stand-in gateway that waits a fixed delay and then resolves.
///
/// It approves every payment unless it was built with [`SimulatedGateway::declining`],
/// which makes it decline every payment with the given reason.
#[derive(Debug)]
pub struct SimulatedGateway {
    delay: Duration,
    decline: Option<String>,
    issued: AtomicU64,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            decline: None,
            issued: AtomicU64::new(0),
        }
    }

    /// Approves immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn declining(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            decline: Some(reason.into()),
            ..Self::new(delay)
        }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn submit(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentFailure> {
        let instrument = match &request.instrument {
            Instrument::Card(card) => format!("card ending {}", card.last4()),
            Instrument::Hosted => format!("hosted checkout '{}'", request.method_id),
        };
        debug!(
            "Simulating {}{} charge for plan '{}' via {}",
            request.currency,
            request.amount.value(),
            request.plan_id,
            instrument
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(reason) = &self.decline {
            return Err(PaymentFailure::Declined(reason.clone()));
        }

        let sequence = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(PaymentReceipt {
            reference: format!("SIM-{sequence:06}"),
        })
    }
}
