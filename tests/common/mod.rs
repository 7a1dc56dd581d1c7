#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const ACCOUNTS: usize = 50;

pub fn write_catalog(path: &Path) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["id", "title", "price", "status"])?;
    wtr.write_record(["b1", "Dune", "12.50", "available"])?;
    wtr.write_record(["b2", "Emma", "8.00", "available"])?;
    wtr.write_record(["b3", "Ulysses", "20.00", "sold_out"])?;

    wtr.flush()?;
    Ok(())
}

pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["type", "account", "items", "amount", "method"])?;

    for _ in 1..=rows {
        wtr.write_record(["topup", "1", "", "1.0", "card"])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Round-robins top-ups and single-book orders over `ACCOUNTS` accounts.
pub fn generate_large_csv(path: &Path, size_mb: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["type", "account", "items", "amount", "method"])?;

    let target_size = (size_mb * 1024 * 1024) as u64;
    let mut row = 0usize;

    // Check size every 5000 rows to avoid syscall overhead
    loop {
        for _ in 0..5000 {
            let account = (row % ACCOUNTS + 1).to_string();
            if row % 4 == 3 {
                wtr.write_record(["order", &account, "b1:1", "", ""])?;
            } else {
                wtr.write_record(["topup", &account, "", "10.0", "card"])?;
            }
            row += 1;
        }
        wtr.flush()?;
        if std::fs::metadata(path)?.len() >= target_size {
            break;
        }
    }
    Ok(())
}
