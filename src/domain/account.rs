use crate::error::PipelineError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a wallet owner. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(PipelineError::ValidationError(
                "Account id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl FromStr for AccountId {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a wallet balance.
///
/// This is a wrapper around `rust_decimal::Decimal`. A committed balance is
/// never negative; [`Balance::checked_apply`] is the only way to derive a new
/// balance from a signed delta.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// Represents a positive monetary amount for wallet operations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PipelineError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PipelineError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PipelineError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

/// Result of applying a signed delta to a balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaOutcome {
    Applied(Balance),
    /// The result would be negative; the balance must stay as it is.
    Insufficient,
    /// The result does not fit in a `Decimal`.
    Overflow,
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn checked_apply(&self, delta: Decimal) -> DeltaOutcome {
        match self.0.checked_add(delta) {
            None => DeltaOutcome::Overflow,
            Some(next) if next < Decimal::ZERO => DeltaOutcome::Insufficient,
            Some(next) => DeltaOutcome::Applied(Self(next)),
        }
    }
}

/// Point-in-time balance of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account: AccountId,
    pub balance: Balance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(PipelineError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(PipelineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_checked_apply() {
        let balance = Balance::new(dec!(500));
        assert_eq!(
            balance.checked_apply(dec!(-300)),
            DeltaOutcome::Applied(Balance::new(dec!(200)))
        );
        assert_eq!(
            balance.checked_apply(dec!(-500)),
            DeltaOutcome::Applied(Balance::ZERO)
        );
        assert_eq!(
            balance.checked_apply(dec!(-500.01)),
            DeltaOutcome::Insufficient
        );
        assert_eq!(
            Balance::new(Decimal::MAX).checked_apply(Decimal::MAX),
            DeltaOutcome::Overflow
        );
    }

    #[test]
    fn test_account_id_rejects_blank() {
        assert!(AccountId::new("  ").is_err());
        assert_eq!(AccountId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn test_account_id_serde_is_plain_string() {
        let id: AccountId = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(id.to_string(), "alice");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"alice\"");
        assert!(serde_json::from_str::<AccountId>("\"\"").is_err());
    }
}
