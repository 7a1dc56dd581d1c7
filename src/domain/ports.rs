use super::account::{AccountBalance, AccountId, Balance};
use super::catalog::{CatalogError, CatalogItem};
use super::event::BrokerMessage;
use super::ledger::{LedgerEntry, TopUpRecord};
use super::order::{Order, OrderId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Synchronous price/availability lookup against the book catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn get_item(&self, item_id: &str) -> std::result::Result<CatalogItem, CatalogError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Stores the order together with its lines in one atomic write.
    async fn create_order(&self, order: Order) -> Result<Order>;
    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>>;
    /// Orders of one account, newest first.
    async fn list_orders_by_account(&self, account: &AccountId) -> Result<Vec<Order>>;
}

/// Exclusive hold on one account's balance row.
///
/// Dropping the transaction without committing releases the row unchanged.
#[async_trait]
pub trait BalanceTx: Send {
    /// Balance read under the lock.
    fn balance(&self) -> Balance;
    /// Writes the new balance and its history entry atomically, then releases the row.
    async fn commit(self: Box<Self>, balance: Balance, entry: LedgerEntry) -> Result<()>;
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Unlocked point read. Unknown accounts read as zero.
    async fn balance(&self, account: &AccountId) -> Result<Balance>;
    /// Locks the account row; waits while another transaction holds it.
    async fn begin(&self, account: &AccountId) -> Result<BalanceTxBox>;
    async fn append_top_up(&self, record: TopUpRecord) -> Result<()>;
    async fn top_ups(&self, account: &AccountId) -> Result<Vec<TopUpRecord>>;
    /// History entries of one account, oldest first.
    async fn history(&self, account: &AccountId) -> Result<Vec<LedgerEntry>>;
    async fn all_balances(&self) -> Result<Vec<AccountBalance>>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> Result<()>;
}

#[async_trait]
pub trait EventSubscriber: Send {
    /// Next message, or `None` once the subscription has ended.
    async fn next_message(&mut self) -> Option<Result<BrokerMessage>>;
    /// Moves the read position past `message`.
    async fn ack(&mut self, message: &BrokerMessage) -> Result<()>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn order_placed(&self, order: &Order) -> Result<()>;
}

pub type CatalogClientBox = Box<dyn CatalogClient>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type BalanceTxBox = Box<dyn BalanceTx>;
pub type EventPublisherBox = Box<dyn EventPublisher>;
pub type EventSubscriberBox = Box<dyn EventSubscriber>;
pub type NotifierRef = Arc<dyn Notifier>;
