//! Flat-file record format for the text-file store
//!
//! Each record set lives in its own headerless, comma-separated file:
//!
//! - coins: `name,value` per coin unit
//! - products: `name,slot` per product unit
//! - machine info: three single-value lines (unit price, cash on hand, total income)
//! - user credit: `user,amount` per user
//!
//! Readers distinguish a missing column (`StorageMissingField`) from a value
//! that does not parse (`StorageCorrupt`).

use crate::types::{Coin, MachineError, MachineFinancials, Product};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;

const COINS: &str = "coins";
const PRODUCTS: &str = "products";
const MACHINE_INFO: &str = "machine info";
const USER_CREDIT: &str = "user credit";

/// A raw record with the line it came from
struct Row {
    line: Option<u64>,
    record: StringRecord,
}

impl Row {
    fn text<'a>(&'a self, record_name: &str, index: usize, field: &str) -> Result<&'a str, MachineError> {
        self.record
            .get(index)
            .ok_or_else(|| MachineError::storage_missing_field(record_name, self.line, field))
    }

    fn decimal(&self, record_name: &str, index: usize, field: &str) -> Result<Decimal, MachineError> {
        let raw = self.text(record_name, index, field)?;
        Decimal::from_str(raw).map_err(|_| {
            MachineError::storage_corrupt(
                record_name,
                self.line,
                format!("invalid {} '{}'", field, raw),
            )
        })
    }
}

fn read_rows(path: &Path, record_name: &str) -> Result<Vec<Row>, MachineError> {
    let file = File::open(path).map_err(|e| MachineError::IoError {
        message: format!("Failed to open {} file '{}': {}", record_name, path.display(), e),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| match MachineError::from(e) {
            MachineError::StorageCorrupt { line, message, .. } => {
                MachineError::storage_corrupt(record_name, line, message)
            }
            other => other,
        })?;
        rows.push(Row {
            line: record.position().map(|pos| pos.line()),
            record,
        });
    }
    Ok(rows)
}

/// Replace the file at `path` with `rows`
///
/// Rows go to a temporary file in the same directory, which is then renamed
/// over `path`, so a failed write leaves the previous records in place.
fn write_rows<I, R>(path: &Path, record_name: &str, rows: I) -> Result<(), MachineError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let io_error = |e: &dyn std::fmt::Display| MachineError::IoError {
        message: format!("Failed to write {} file '{}': {}", record_name, path.display(), e),
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|e| io_error(&e))?;

    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file.as_file_mut());

        for row in rows {
            writer.write_record(row).map_err(|e| io_error(&e))?;
        }
        writer.flush().map_err(|e| io_error(&e))?;
    }

    file.as_file().sync_all().map_err(|e| io_error(&e))?;
    file.persist(path).map_err(|e| io_error(&e.error))?;
    Ok(())
}

/// Read every coin unit
pub fn read_coins(path: &Path) -> Result<Vec<Coin>, MachineError> {
    read_rows(path, COINS)?
        .iter()
        .map(|row| {
            Ok(Coin::new(
                row.text(COINS, 0, "name")?,
                row.decimal(COINS, 1, "value")?,
            ))
        })
        .collect()
}

pub fn write_coins(path: &Path, coins: &[Coin]) -> Result<(), MachineError> {
    write_rows(
        path,
        COINS,
        coins
            .iter()
            .map(|coin| [coin.name.clone(), coin.value.to_string()]),
    )
}

/// Read every product unit
pub fn read_products(path: &Path) -> Result<Vec<Product>, MachineError> {
    read_rows(path, PRODUCTS)?
        .iter()
        .map(|row| {
            Ok(Product::new(
                row.text(PRODUCTS, 0, "name")?,
                row.text(PRODUCTS, 1, "slot")?,
            ))
        })
        .collect()
}

pub fn write_products(path: &Path, products: &[Product]) -> Result<(), MachineError> {
    write_rows(
        path,
        PRODUCTS,
        products
            .iter()
            .map(|product| [product.name.as_str(), product.slot.as_str()]),
    )
}

/// Read the machine financials (three lines: price, cash on hand, total income)
pub fn read_financials(path: &Path) -> Result<MachineFinancials, MachineError> {
    let rows = read_rows(path, MACHINE_INFO)?;

    let value = |index: usize, field: &str| -> Result<Decimal, MachineError> {
        let row = rows.get(index).ok_or_else(|| {
            MachineError::storage_missing_field(MACHINE_INFO, Some(index as u64 + 1), field)
        })?;
        row.decimal(MACHINE_INFO, 0, field)
    };

    Ok(MachineFinancials {
        unit_price: value(0, "unit price")?,
        cash_on_hand: value(1, "cash on hand")?,
        total_income: value(2, "total income")?,
    })
}

pub fn write_financials(path: &Path, financials: &MachineFinancials) -> Result<(), MachineError> {
    write_rows(
        path,
        MACHINE_INFO,
        [
            financials.unit_price,
            financials.cash_on_hand,
            financials.total_income,
        ]
        .iter()
        .map(|value| [value.to_string()]),
    )
}

/// Read credit per user
pub fn read_credits(path: &Path) -> Result<BTreeMap<String, Decimal>, MachineError> {
    read_rows(path, USER_CREDIT)?
        .iter()
        .map(|row| {
            Ok((
                row.text(USER_CREDIT, 0, "user")?.to_string(),
                row.decimal(USER_CREDIT, 1, "amount")?,
            ))
        })
        .collect()
}

pub fn write_credits(path: &Path, credits: &BTreeMap<String, Decimal>) -> Result<(), MachineError> {
    write_rows(
        path,
        USER_CREDIT,
        credits
            .iter()
            .map(|(user, amount)| [user.clone(), amount.to_string()]),
    )
}
