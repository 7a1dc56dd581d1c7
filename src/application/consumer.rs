use super::wallet::WalletEngine;
use crate::domain::account::{AccountId, Balance};
use crate::domain::event::{BrokerMessage, DebitEvent};
use crate::domain::order::OrderId;
use crate::domain::ports::EventSubscriber;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const RECV_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Terminal state of one consumed message.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumeOutcome {
    /// Debited; the message is acknowledged.
    Applied {
        order_id: OrderId,
        account: AccountId,
        balance: Balance,
    },
    /// Payload could not be decoded; dropped.
    ParseFailed { reason: String },
    /// Debit was refused; logged only. The order stays pending.
    DebitFailed {
        order_id: OrderId,
        account: AccountId,
        reason: String,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerStats {
    pub received: u64,
    pub applied: u64,
    pub parse_failed: u64,
    pub debit_failed: u64,
}

impl ConsumerStats {
    fn record(&mut self, outcome: &ConsumeOutcome) {
        self.received += 1;
        match outcome {
            ConsumeOutcome::Applied { .. } => self.applied += 1,
            ConsumeOutcome::ParseFailed { .. } => self.parse_failed += 1,
            ConsumeOutcome::DebitFailed { .. } => self.debit_failed += 1,
        }
    }
}

/// Wallet-side adapter that turns debit events into debits.
///
/// Delivery is at-least-once and the payload carries no event id, so a
/// redelivered message debits the account again. Nothing is retried and no
/// compensating credit is issued.
pub struct DebitConsumer {
    wallet: Arc<WalletEngine>,
}

impl DebitConsumer {
    pub fn new(wallet: Arc<WalletEngine>) -> Self {
        Self { wallet }
    }

    /// Decodes and applies one message. Never fails; the outcome says what happened.
    pub async fn handle_message(&self, message: &BrokerMessage) -> ConsumeOutcome {
        let event = match DebitEvent::from_slice(&message.payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(topic = %message.topic, offset = message.offset, error = %e, "dropping malformed debit event");
                return ConsumeOutcome::ParseFailed {
                    reason: e.to_string(),
                };
            }
        };

        match self
            .wallet
            .debit(&event.account_id, event.total_amount)
            .await
        {
            Ok(balance) => {
                info!(order_id = %event.order_id, account = %event.account_id, amount = %event.total_amount, balance = %balance.value(), "debit applied");
                ConsumeOutcome::Applied {
                    order_id: event.order_id,
                    account: event.account_id,
                    balance,
                }
            }
            Err(e) => {
                error!(order_id = %event.order_id, account = %event.account_id, amount = %event.total_amount, error = %e, "failed to process debit");
                ConsumeOutcome::DebitFailed {
                    order_id: event.order_id,
                    account: event.account_id,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Consumes sequentially until the subscription ends or `shutdown` resolves.
    ///
    /// The read position is advanced past every message whatever its outcome.
    pub async fn run<S, F>(&self, subscriber: &mut S, shutdown: F) -> ConsumerStats
    where
        S: EventSubscriber + ?Sized,
        F: Future<Output = ()>,
    {
        let mut stats = ConsumerStats::default();
        tokio::pin!(shutdown);
        info!("debit consumer started");

        loop {
            let next = tokio::select! {
                _ = &mut shutdown => break,
                next = subscriber.next_message() => next,
            };

            let message = match next {
                None => break,
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    warn!(error = %e, "could not read message");
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(RECV_ERROR_BACKOFF) => continue,
                    }
                }
            };

            let outcome = self.handle_message(&message).await;
            stats.record(&outcome);

            if let Err(e) = subscriber.ack(&message).await {
                warn!(offset = message.offset, error = %e, "failed to acknowledge message");
            }
        }

        info!(
            received = stats.received,
            applied = stats.applied,
            parse_failed = stats.parse_failed,
            debit_failed = stats.debit_failed,
            "debit consumer stopped"
        );
        stats
    }
}
