use passbook_core::model::{ParsedStatement, StatementSummary};
use passbook_core::TransactionRecord;
use rust_decimal::Decimal;

const MAX_PARTICULARS: usize = 48;

pub fn print(parsed: &ParsedStatement, summary: &StatementSummary) {
    if parsed.records.is_empty() {
        return;
    }

    let date_width = parsed
        .records
        .iter()
        .map(|r| r.date.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let particulars_width = parsed
        .records
        .iter()
        .map(|r| r.particulars.chars().count())
        .max()
        .unwrap_or(11)
        .clamp(11, MAX_PARTICULARS);

    println!(
        "  {:<dw$}  {:<pw$}  {:>12}  {:>12}  {:>14}",
        "Date",
        "Particulars",
        "Debit",
        "Credit",
        "Balance",
        dw = date_width,
        pw = particulars_width
    );
    println!(
        "  {}",
        "-".repeat(date_width + particulars_width + 12 + 12 + 14 + 8)
    );

    for r in &parsed.records {
        print_row(r, date_width, particulars_width);
    }

    println!();
    println!(
        "  {} transaction(s) via {} extraction",
        summary.record_count, parsed.mode
    );
    println!("  Total debit:  {}", summary.total_debit);
    println!("  Total credit: {}", summary.total_credit);
    if let (Some(open), Some(close)) = (summary.opening_balance, summary.closing_balance) {
        println!("  Balance:      {} -> {}", open, close);
    }
    if summary.balance_breaks > 0 {
        println!(
            "  Balance breaks: {} (running balance does not follow the movements)",
            summary.balance_breaks
        );
    }
}

fn print_row(r: &TransactionRecord, date_width: usize, particulars_width: usize) {
    let cheque = r
        .cheque_number
        .as_ref()
        .map(|c| format!("  [chq {}]", c))
        .unwrap_or_default();
    println!(
        "  {:<dw$}  {:<pw$}  {:>12}  {:>12}  {:>14}{}",
        r.date,
        truncate(&r.particulars, particulars_width),
        blank_zero(r.debit()),
        blank_zero(r.credit()),
        r.balance,
        cheque,
        dw = date_width,
        pw = particulars_width
    );
}

fn blank_zero(v: Decimal) -> String {
    if v.is_zero() {
        String::new()
    } else {
        v.to_string()
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
