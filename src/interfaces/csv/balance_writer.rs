use crate::domain::account::AccountBalance;
use crate::error::Result;
use std::io::Write;

/// Writes `account,balance` rows. Balances are normalized (`70.0` prints as `70`).
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_balances(&mut self, balances: Vec<AccountBalance>) -> Result<()> {
        self.writer.write_record(["account", "balance"])?;
        for entry in balances {
            self.writer.write_record([
                entry.account.to_string(),
                entry.balance.value().normalize().to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
