use super::locks::{AccountGuard, AccountLocks};
use crate::domain::account::{AccountBalance, AccountId, Balance};
use crate::domain::ledger::{LedgerEntry, TopUpRecord};
use crate::domain::order::{Order, OrderId};
use crate::domain::ports::{BalanceTx, BalanceTxBox, LedgerStore, OrderStore};
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for current balances, keyed by account id.
pub const CF_BALANCES: &str = "balances";
/// Column Family for the append-only balance history.
pub const CF_LEDGER: &str = "ledger_entries";
/// Column Family for top-up audit records.
pub const CF_TOP_UPS: &str = "top_ups";
/// Column Family for orders (lines embedded), keyed by order id.
pub const CF_ORDERS: &str = "orders";

const KEY_SEP: u8 = 0;

/// A persistent store implementation using RocksDB.
///
/// Implements both [`LedgerStore`] and [`OrderStore`] on separate Column
/// Families. Row locking is done in-process through an [`AccountLocks`]
/// arena, so one process must own the database; the balance and its history
/// entry are then written in one `WriteBatch`.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    locks: AccountLocks,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating
    /// any missing column family.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [CF_BALANCES, CF_LEDGER, CF_TOP_UPS, CF_ORDERS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self {
            db: Arc::new(db),
            locks: AccountLocks::new(),
        })
    }
}

fn cf<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily> {
    db.cf_handle(name).ok_or_else(|| {
        PipelineError::PersistenceError(format!("{name} column family not found"))
    })
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| PipelineError::PersistenceError(format!("Serialization error: {e}")))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| PipelineError::PersistenceError(format!("Deserialization error: {e}")))
}

/// `account \0` prefix shared by all history and top-up keys of one account.
fn account_prefix(account: &AccountId) -> Vec<u8> {
    let mut key = account.as_str().as_bytes().to_vec();
    key.push(KEY_SEP);
    key
}

/// History keys sort by creation time within an account.
fn timed_key(account: &AccountId, nanos: i64, id: &uuid::Uuid) -> Vec<u8> {
    let mut key = account_prefix(account);
    key.extend_from_slice(format!("{:020}", nanos.max(0)).as_bytes());
    key.extend_from_slice(id.as_bytes());
    key
}

fn read_balance(db: &DB, account: &AccountId) -> Result<Balance> {
    let handle = cf(db, CF_BALANCES)?;
    match db.get_cf(handle, account.as_str().as_bytes())? {
        Some(bytes) => decode(&bytes),
        None => Ok(Balance::ZERO),
    }
}

fn scan_prefix<T: DeserializeOwned>(db: &DB, cf_name: &str, prefix: &[u8]) -> Result<Vec<T>> {
    let handle = cf(db, cf_name)?;
    let mut out = Vec::new();
    for item in db.iterator_cf(handle, IteratorMode::From(prefix, Direction::Forward)) {
        let (key, value) = item?;
        if !key.starts_with(prefix) {
            break;
        }
        out.push(decode(&value)?);
    }
    Ok(out)
}

struct RocksBalanceTx {
    db: Arc<DB>,
    account: AccountId,
    current: Balance,
    _guard: AccountGuard,
}

#[async_trait]
impl BalanceTx for RocksBalanceTx {
    fn balance(&self) -> Balance {
        self.current
    }

    async fn commit(self: Box<Self>, balance: Balance, entry: LedgerEntry) -> Result<()> {
        let balances = cf(&self.db, CF_BALANCES)?;
        let ledger = cf(&self.db, CF_LEDGER)?;
        let nanos = entry.created_at.timestamp_nanos_opt().unwrap_or_default();

        let mut batch = WriteBatch::default();
        batch.put_cf(balances, self.account.as_str().as_bytes(), encode(&balance)?);
        batch.put_cf(ledger, timed_key(&self.account, nanos, &entry.id), encode(&entry)?);
        self.db.write(batch)?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for RocksDBStore {
    async fn balance(&self, account: &AccountId) -> Result<Balance> {
        read_balance(&self.db, account)
    }

    async fn begin(&self, account: &AccountId) -> Result<BalanceTxBox> {
        let guard = self.locks.acquire(account).await;
        let current = read_balance(&self.db, account)?;
        Ok(Box::new(RocksBalanceTx {
            db: self.db.clone(),
            account: account.clone(),
            current,
            _guard: guard,
        }))
    }

    async fn append_top_up(&self, record: TopUpRecord) -> Result<()> {
        let handle = cf(&self.db, CF_TOP_UPS)?;
        let nanos = record.created_at.timestamp_nanos_opt().unwrap_or_default();
        let key = timed_key(&record.account, nanos, &record.id);
        self.db.put_cf(handle, key, encode(&record)?)?;
        Ok(())
    }

    async fn top_ups(&self, account: &AccountId) -> Result<Vec<TopUpRecord>> {
        scan_prefix(&self.db, CF_TOP_UPS, &account_prefix(account))
    }

    async fn history(&self, account: &AccountId) -> Result<Vec<LedgerEntry>> {
        scan_prefix(&self.db, CF_LEDGER, &account_prefix(account))
    }

    async fn all_balances(&self) -> Result<Vec<AccountBalance>> {
        let handle = cf(&self.db, CF_BALANCES)?;
        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(handle, IteratorMode::Start) {
            let (key, value) = item?;
            let account = AccountId::new(String::from_utf8_lossy(&key).into_owned())?;
            accounts.push(AccountBalance {
                account,
                balance: decode(&value)?,
            });
        }
        Ok(accounts)
    }
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn create_order(&self, order: Order) -> Result<Order> {
        let handle = cf(&self.db, CF_ORDERS)?;
        // Lines are part of the value, so one put is atomic for the whole order.
        self.db
            .put_cf(handle, order.id.to_string().as_bytes(), encode(&order)?)?;
        Ok(order)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        let handle = cf(&self.db, CF_ORDERS)?;
        match self.db.get_cf(handle, order_id.to_string().as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn list_orders_by_account(&self, account: &AccountId) -> Result<Vec<Order>> {
        let handle = cf(&self.db, CF_ORDERS)?;
        let mut orders = Vec::new();
        for item in self.db.iterator_cf(handle, IteratorMode::Start) {
            let (_key, value) = item?;
            let order: Order = decode(&value)?;
            if &order.account == account {
                orders.push(order);
            }
        }
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
