use super::csv::command_reader::{CommandRecord, CommandType};
use crate::application::consumer::{ConsumeOutcome, DebitConsumer};
use crate::application::notify::LogNotifier;
use crate::application::orchestrator::OrderOrchestrator;
use crate::application::wallet::WalletEngine;
use crate::config::PipelineConfig;
use crate::domain::account::{AccountBalance, AccountId};
use crate::domain::order::{Order, OrderRequest};
use crate::domain::ports::{CatalogClientBox, EventSubscriber, LedgerStoreBox, OrderStoreBox};
use crate::error::Result;
use crate::infrastructure::broker::{InMemoryBroker, InMemorySubscriber};
use std::sync::Arc;
use tracing::info;

const DEFAULT_TOP_UP_METHOD: &str = "manual";

/// Runs both halves of the saga in one process over an in-memory broker.
///
/// After every order the pending debit events are consumed before the next
/// command, so a replay is deterministic.
pub struct ReplayPipeline {
    orchestrator: OrderOrchestrator,
    wallet: Arc<WalletEngine>,
    consumer: DebitConsumer,
    subscriber: InMemorySubscriber,
}

impl ReplayPipeline {
    pub fn new(
        catalog: CatalogClientBox,
        orders: OrderStoreBox,
        ledger: LedgerStoreBox,
        config: &PipelineConfig,
    ) -> Self {
        let (publisher, subscriber) = InMemoryBroker::channel();
        let wallet = Arc::new(WalletEngine::new(ledger));
        let orchestrator = OrderOrchestrator::new(catalog, orders, Box::new(publisher), config)
            .with_notifier(Arc::new(LogNotifier));
        let consumer = DebitConsumer::new(wallet.clone());

        Self {
            orchestrator,
            wallet,
            consumer,
            subscriber,
        }
    }

    pub async fn apply(&mut self, command: CommandRecord) -> Result<()> {
        let account = AccountId::new(command.account.as_str())?;
        match command.r#type {
            CommandType::Topup => {
                let method = command.method.as_deref().unwrap_or(DEFAULT_TOP_UP_METHOD);
                self.wallet
                    .top_up(&account, command.required_amount()?, method)
                    .await?;
            }
            CommandType::Credit => {
                self.wallet
                    .credit(&account, command.required_amount()?)
                    .await?;
            }
            CommandType::Debit => {
                self.wallet
                    .debit(&account, command.required_amount()?)
                    .await?;
            }
            CommandType::Order => {
                let request = OrderRequest::new(account, command.order_items()?);
                self.orchestrator.create_order(request).await?;
                self.drain().await?;
            }
        }
        Ok(())
    }

    /// Consumes every debit event queued so far.
    async fn drain(&mut self) -> Result<Vec<ConsumeOutcome>> {
        let mut outcomes = Vec::new();
        while let Some(message) = self.subscriber.try_next() {
            outcomes.push(self.consumer.handle_message(&message).await);
            self.subscriber.ack(&message).await?;
        }
        Ok(outcomes)
    }

    pub async fn orders(&self, account: &AccountId) -> Result<Vec<Order>> {
        self.orchestrator.orders_for_account(account).await
    }

    /// Final balances, once every order notification has finished.
    pub async fn into_balances(self) -> Result<Vec<AccountBalance>> {
        self.orchestrator.wait_for_notifications().await;
        let balances = self.wallet.balances().await?;
        info!(accounts = balances.len(), "replay finished");
        Ok(balances)
    }
}
