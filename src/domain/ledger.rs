use super::account::{AccountId, Amount, Balance};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    TopUp,
    Debit,
    Credit,
}

/// One committed balance mutation. Appended together with the balance write
/// and never modified afterwards.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub account: AccountId,
    pub kind: EntryKind,
    /// Signed change; negative for debits.
    pub delta: Decimal,
    pub balance_after: Balance,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(account: AccountId, kind: EntryKind, delta: Decimal, balance_after: Balance) -> Self {
        Self {
            id: Uuid::new_v4(),
            account,
            kind,
            delta,
            balance_after,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TopUpStatus {
    Success,
}

/// Audit record of a completed top-up.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TopUpRecord {
    pub id: Uuid,
    pub account: AccountId,
    pub amount: Amount,
    pub method: String,
    pub status: TopUpStatus,
    pub created_at: DateTime<Utc>,
}

impl TopUpRecord {
    pub fn success(account: AccountId, amount: Amount, method: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account,
            amount,
            method: method.into(),
            status: TopUpStatus::Success,
            created_at: Utc::now(),
        }
    }
}
