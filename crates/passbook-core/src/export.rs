use crate::error::PassbookError;
use crate::model::{money, TransactionRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Spreadsheet columns, in order.
pub const COLUMNS: [&str; 5] = ["Date", "Particulars", "Debit", "Credit", "Balance"];

/// Flat five-column view of a record. Amounts carry two decimals and the
/// side a record does not move is `0.00`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow<'a> {
    pub date: &'a str,
    pub particulars: &'a str,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
}

impl<'a> From<&'a TransactionRecord> for ExportRow<'a> {
    fn from(r: &'a TransactionRecord) -> Self {
        ExportRow {
            date: &r.date,
            particulars: &r.particulars,
            debit: r.debit(),
            credit: r.credit(),
            balance: money(r.balance),
        }
    }
}

/// Full record with the derived debit and credit columns alongside.
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    #[serde(flatten)]
    pub record: &'a TransactionRecord,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl<'a> From<&'a TransactionRecord> for RecordView<'a> {
    fn from(record: &'a TransactionRecord) -> Self {
        RecordView {
            record,
            debit: record.debit(),
            credit: record.credit(),
        }
    }
}

/// Write records as CSV. The header row is written even with no records.
pub fn write_csv<W: Write>(records: &[TransactionRecord], out: W) -> Result<(), PassbookError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    wtr.write_record(COLUMNS)?;
    for r in records {
        wtr.serialize(ExportRow::from(r))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn csv_string(records: &[TransactionRecord]) -> Result<String, PassbookError> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Pretty JSON array of [`RecordView`]s.
pub fn json_string(records: &[TransactionRecord]) -> Result<String, PassbookError> {
    let views: Vec<RecordView<'_>> = records.iter().map(RecordView::from).collect();
    Ok(serde_json::to_string_pretty(&views)?)
}
