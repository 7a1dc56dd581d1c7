use super::account::AccountId;
use super::order::{Order, OrderId};
use crate::error::{PipelineError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Instruction to debit an account for a stored order.
///
/// Wire format: `{"orderID": "...", "accountID": "...", "totalAmount": "..."}`.
/// There is no event id, so a redelivered message cannot be told apart from
/// a new one.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct DebitEvent {
    #[serde(rename = "orderID")]
    pub order_id: OrderId,
    #[serde(rename = "accountID")]
    pub account_id: AccountId,
    #[serde(rename = "totalAmount")]
    pub total_amount: Decimal,
}

impl DebitEvent {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            account_id: order.account.clone(),
            total_amount: order.total_amount,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| PipelineError::QueueError(e.to_string()))
    }

    pub fn from_slice(payload: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(payload)
    }
}

/// A message as handed over by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokerMessage {
    pub topic: String,
    pub key: Option<String>,
    pub payload: Vec<u8>,
    pub partition: i32,
    pub offset: i64,
}
