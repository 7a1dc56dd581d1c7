use crate::domain::order::OrderItem;
use crate::error::{PipelineError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Topup,
    Credit,
    Debit,
    Order,
}

/// One row of a replay file: `type, account, items, amount, method`.
///
/// `items` is only used by `order` rows and has the form `id:qty|id:qty`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub r#type: CommandType,
    pub account: String,
    pub items: Option<String>,
    pub amount: Option<Decimal>,
    pub method: Option<String>,
}

impl CommandRecord {
    pub fn order_items(&self) -> Result<Vec<OrderItem>> {
        let raw = self.items.as_deref().unwrap_or_default();
        raw.split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (item_id, quantity) = part.split_once(':').unwrap_or((part, "1"));
                let quantity = quantity.trim().parse::<u32>().map_err(|_| {
                    PipelineError::ValidationError(format!("Invalid quantity in '{part}'"))
                })?;
                Ok(OrderItem {
                    item_id: item_id.trim().to_string(),
                    quantity,
                })
            })
            .collect()
    }

    pub fn required_amount(&self) -> Result<Decimal> {
        self.amount.ok_or_else(|| {
            PipelineError::ValidationError(format!("{:?} command is missing an amount", self.r#type))
        })
    }
}

/// Reads replay commands from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<CommandRecord>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and deserializes commands, one row at a time.
    pub fn commands(self) -> impl Iterator<Item = Result<CommandRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PipelineError::from))
    }
}
