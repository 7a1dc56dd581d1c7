use super::account::AccountId;
use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A priced line, fixed at the catalog price seen during validation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: OrderId,
    pub account: AccountId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Builds a fresh `pending` order, summing the line totals.
    pub fn pending(account: AccountId, lines: Vec<OrderLine>) -> Result<Self> {
        let mut total = Decimal::ZERO;
        for line in &lines {
            total = line
                .total()
                .and_then(|t| total.checked_add(t))
                .ok_or_else(|| {
                    PipelineError::ValidationError("Order total is out of range".to_string())
                })?;
        }

        Ok(Self {
            id: OrderId::new(),
            account,
            total_amount: total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            lines,
        })
    }
}

/// One requested item of an incoming order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct OrderItem {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderRequest {
    pub account: AccountId,
    pub items: Vec<OrderItem>,
}

impl OrderRequest {
    pub fn new(account: AccountId, items: Vec<OrderItem>) -> Self {
        Self { account, items }
    }

    /// Checks what can be checked without the catalog.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(PipelineError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }
        for item in &self.items {
            if item.item_id.trim().is_empty() {
                return Err(PipelineError::ValidationError(
                    "Item id must not be empty".to_string(),
                ));
            }
            if item.quantity == 0 {
                return Err(PipelineError::ItemRejected {
                    item: item.item_id.clone(),
                    reason: "quantity must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}
