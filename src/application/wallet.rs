use crate::domain::account::{AccountBalance, AccountId, Amount, Balance, DeltaOutcome};
use crate::domain::ledger::{EntryKind, LedgerEntry, TopUpRecord};
use crate::domain::ports::LedgerStoreBox;
use crate::error::{PipelineError, Result};
use rust_decimal::Decimal;
use tracing::{debug, error, info};

/// Owns all balance mutations.
///
/// Every mutation goes through [`WalletEngine::apply_delta`], which holds the
/// account's row lock for the whole read-check-write cycle. Each call touches
/// exactly one account.
pub struct WalletEngine {
    store: LedgerStoreBox,
}

impl WalletEngine {
    /// Creates a new `WalletEngine` over the given ledger store.
    pub fn new(store: LedgerStoreBox) -> Self {
        Self { store }
    }

    pub async fn balance(&self, account: &AccountId) -> Result<Balance> {
        self.store.balance(account).await
    }

    /// Applies a signed delta; negative deltas are recorded as debits.
    ///
    /// Fails with `InsufficientFunds` and leaves the row untouched when the
    /// result would be negative. A zero delta is rejected.
    pub async fn apply_delta(&self, account: &AccountId, delta: Decimal) -> Result<Balance> {
        let kind = if delta.is_sign_negative() {
            EntryKind::Debit
        } else {
            EntryKind::Credit
        };
        self.apply(account, delta, kind).await
    }

    async fn apply(&self, account: &AccountId, delta: Decimal, kind: EntryKind) -> Result<Balance> {
        if delta.is_zero() {
            return Err(PipelineError::ValidationError(
                "Delta must not be zero".to_string(),
            ));
        }

        let tx = self.store.begin(account).await?;
        let current = tx.balance();

        let next = match current.checked_apply(delta) {
            DeltaOutcome::Applied(next) => next,
            DeltaOutcome::Insufficient => {
                debug!(%account, balance = %current.value(), %delta, "delta rejected");
                return Err(PipelineError::InsufficientFunds {
                    account: account.clone(),
                    balance: current.value(),
                    delta,
                });
            }
            DeltaOutcome::Overflow => {
                return Err(PipelineError::ValidationError(
                    "Balance would overflow".to_string(),
                ));
            }
        };

        tx.commit(next, LedgerEntry::new(account.clone(), kind, delta, next))
            .await?;
        debug!(%account, %delta, balance = %next.value(), "delta committed");
        Ok(next)
    }

    /// Credits `amount` and then writes the audit record.
    ///
    /// If only the audit write fails the credit stands and the call returns
    /// `AuditWriteError`.
    pub async fn top_up(
        &self,
        account: &AccountId,
        amount: Decimal,
        method: &str,
    ) -> Result<TopUpRecord> {
        let amount = Amount::new(amount)?;
        let balance = self.apply(account, amount.value(), EntryKind::TopUp).await?;

        let record = TopUpRecord::success(account.clone(), amount, method);
        if let Err(e) = self.store.append_top_up(record.clone()).await {
            error!(%account, amount = %amount.value(), error = %e, "top-up applied but audit record was not written");
            return Err(PipelineError::AuditWriteError(e.to_string()));
        }

        info!(%account, amount = %amount.value(), method, balance = %balance.value(), "top-up completed");
        Ok(record)
    }

    pub async fn debit(&self, account: &AccountId, amount: Decimal) -> Result<Balance> {
        let amount = Amount::new(amount)?;
        self.apply(account, -amount.value(), EntryKind::Debit).await
    }

    pub async fn credit(&self, account: &AccountId, amount: Decimal) -> Result<Balance> {
        let amount = Amount::new(amount)?;
        self.apply(account, amount.value(), EntryKind::Credit).await
    }

    pub async fn history(&self, account: &AccountId) -> Result<Vec<LedgerEntry>> {
        self.store.history(account).await
    }

    pub async fn top_ups(&self, account: &AccountId) -> Result<Vec<TopUpRecord>> {
        self.store.top_ups(account).await
    }

    /// Snapshot of every known account.
    pub async fn balances(&self) -> Result<Vec<AccountBalance>> {
        self.store.all_balances().await
    }
}
