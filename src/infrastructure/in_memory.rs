use super::locks::{AccountGuard, AccountLocks};
use crate::domain::account::{AccountBalance, AccountId, Balance};
use crate::domain::catalog::{CatalogError, CatalogItem};
use crate::domain::ledger::{LedgerEntry, TopUpRecord};
use crate::domain::order::{Order, OrderId};
use crate::domain::ports::{BalanceTx, BalanceTxBox, CatalogClient, LedgerStore, OrderStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger.
///
/// Balances live in `Arc<RwLock<HashMap<AccountId, Balance>>>`; writers first
/// take the account's slot in an [`AccountLocks`] arena so read-modify-write
/// cycles on one account serialize while other accounts proceed.
/// `Clone` shares the underlying state.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    balances: Arc<RwLock<HashMap<AccountId, Balance>>>,
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
    top_ups: Arc<RwLock<Vec<TopUpRecord>>>,
    locks: AccountLocks,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

struct InMemoryBalanceTx {
    account: AccountId,
    current: Balance,
    balances: Arc<RwLock<HashMap<AccountId, Balance>>>,
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
    _guard: AccountGuard,
}

#[async_trait]
impl BalanceTx for InMemoryBalanceTx {
    fn balance(&self) -> Balance {
        self.current
    }

    async fn commit(self: Box<Self>, balance: Balance, entry: LedgerEntry) -> Result<()> {
        let mut balances = self.balances.write().await;
        let mut entries = self.entries.write().await;
        balances.insert(self.account.clone(), balance);
        entries.push(entry);
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn balance(&self, account: &AccountId) -> Result<Balance> {
        let balances = self.balances.read().await;
        Ok(balances.get(account).copied().unwrap_or(Balance::ZERO))
    }

    async fn begin(&self, account: &AccountId) -> Result<BalanceTxBox> {
        let guard = self.locks.acquire(account).await;
        let current = self.balance(account).await?;
        Ok(Box::new(InMemoryBalanceTx {
            account: account.clone(),
            current,
            balances: self.balances.clone(),
            entries: self.entries.clone(),
            _guard: guard,
        }))
    }

    async fn append_top_up(&self, record: TopUpRecord) -> Result<()> {
        self.top_ups.write().await.push(record);
        Ok(())
    }

    async fn top_ups(&self, account: &AccountId) -> Result<Vec<TopUpRecord>> {
        let top_ups = self.top_ups.read().await;
        Ok(top_ups
            .iter()
            .filter(|r| &r.account == account)
            .cloned()
            .collect())
    }

    async fn history(&self, account: &AccountId) -> Result<Vec<LedgerEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| &e.account == account)
            .cloned()
            .collect())
    }

    async fn all_balances(&self) -> Result<Vec<AccountBalance>> {
        let balances = self.balances.read().await;
        let mut all: Vec<AccountBalance> = balances
            .iter()
            .map(|(account, balance)| AccountBalance {
                account: account.clone(),
                balance: *balance,
            })
            .collect();
        all.sort_by(|a, b| a.account.cmp(&b.account));
        Ok(all)
    }
}

/// A thread-safe in-memory order table.
///
/// Orders are kept in insertion order, which is also `created_at` order.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders across all accounts.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(&self, order: Order) -> Result<Order> {
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == order_id).cloned())
    }

    async fn list_orders_by_account(&self, account: &AccountId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .rev()
            .filter(|o| &o.account == account)
            .cloned()
            .collect())
    }
}

/// Fixed catalog held in memory; also what the CSV catalog loader produces.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    items: Arc<HashMap<String, CatalogItem>>,
}

impl InMemoryCatalog {
    pub fn new(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        Self {
            items: Arc::new(items.into_iter().map(|i| (i.id.clone(), i)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn get_item(&self, item_id: &str) -> std::result::Result<CatalogItem, CatalogError> {
        self.items
            .get(item_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(item_id.to_string()))
    }
}
