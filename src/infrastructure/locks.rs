use crate::domain::account::AccountId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Arena of per-account row locks.
///
/// Each account gets its own async mutex on first use; holding one never
/// blocks another account. There is no way to take two slots in one call.
/// A slot is removed when its last guard drops with nobody waiting, so the
/// arena only holds accounts that are locked or contended.
#[derive(Default, Clone)]
pub struct AccountLocks {
    slots: Arc<DashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `account`. Released when the guard drops.
    pub async fn acquire(&self, account: &AccountId) -> AccountGuard {
        // The dashmap shard guard must be gone before awaiting.
        let slot = self.slots.entry(account.clone()).or_default().clone();
        let guard = slot.lock_owned().await;
        AccountGuard {
            guard: Some(guard),
            account: account.clone(),
            slots: self.slots.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Exclusive hold on one account slot.
pub struct AccountGuard {
    guard: Option<OwnedMutexGuard<()>>,
    account: AccountId,
    slots: Arc<DashMap<AccountId, Arc<Mutex<()>>>>,
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map still references the slot: no holder and no waiter.
        self.slots
            .remove_if(&self.account, |_, slot| Arc::strong_count(slot) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_other_accounts_are_not_blocked() {
        let locks = AccountLocks::new();
        let a = AccountId::new("a").unwrap();
        let b = AccountId::new("b").unwrap();

        let _held = locks.acquire(&a).await;
        let other = tokio::time::timeout(Duration::from_millis(200), locks.acquire(&b)).await;
        assert!(other.is_ok(), "lock on b must not wait for a");
        assert_eq!(locks.len(), 2);
        drop(other);
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_released_slots_are_evicted() {
        let locks = AccountLocks::new();
        for i in 0..100 {
            let id = AccountId::new(format!("ghost-{i}")).unwrap();
            drop(locks.acquire(&id).await);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_slot_with_waiter_survives_release() {
        let locks = AccountLocks::new();
        let a = AccountId::new("a").unwrap();

        let held = locks.acquire(&a).await;
        let waiter = {
            let locks = locks.clone();
            let a = a.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&a).await;
                tokio::time::sleep(Duration::from_millis(50)).await;
            })
        };
        // Let the waiter queue on the slot.
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(held);

        // The waiter now holds the same slot; a third caller must queue behind it.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let third = tokio::time::timeout(Duration::from_millis(10), locks.acquire(&a)).await;
        assert!(third.is_err(), "slot was replaced while still held");

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_same_account_waits_for_release() {
        let locks = AccountLocks::new();
        let a = AccountId::new("a").unwrap();

        let held = locks.acquire(&a).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&a)).await;
        assert!(second.is_err(), "second acquire must wait while the first is held");

        drop(held);
        let third = tokio::time::timeout(Duration::from_millis(200), locks.acquire(&a)).await;
        assert!(third.is_ok());
    }
}
