use passbook_core::error::PassbookError;
use passbook_core::export;
use passbook_core::TransactionRecord;

pub fn print(records: &[TransactionRecord]) -> Result<(), PassbookError> {
    println!("{}", export::json_string(records)?);
    Ok(())
}
