use crate::model::TransactionRecord;
use crate::parsing::classify::LineClass;
use crate::parsing::normalize::normalize_spaces;
use rust_decimal::Decimal;

/// State carried from one line to the next during a parse pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblerState {
    pub previous_balance: Option<Decimal>,
    /// Empty when no date has been seen.
    pub pending_date: String,
    pub pending_description: Vec<String>,
}

/// Stitches classified lines into records.
///
/// Dates and description fragments that precede an amount line are held
/// back and attached to the next transaction.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    state: AssemblerState,
    records: Vec<TransactionRecord>,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AssemblerState {
        &self.state
    }

    pub fn previous_balance(&self) -> Option<Decimal> {
        self.state.previous_balance
    }

    pub fn push(&mut self, class: LineClass) {
        match class {
            LineClass::DateOnly { date, residual } => self.on_date_only(date, residual),
            LineClass::Transaction(record) => self.on_transaction(record),
            LineClass::Fragment(text) => self.on_fragment(text),
            LineClass::Discard => {}
        }
    }

    pub fn on_date_only(&mut self, date: String, residual: Option<String>) {
        self.state.pending_date = date;
        if let Some(text) = residual {
            self.state.pending_description.push(text);
        }
    }

    /// Attach pending context and emit. The pending date stays: several
    /// transactions often share one date header.
    pub fn on_transaction(&mut self, mut record: TransactionRecord) {
        if record.date.is_empty() {
            record.date = self.state.pending_date.clone();
        }
        if !self.state.pending_description.is_empty() {
            let prefix = self.state.pending_description.join(" ");
            record.particulars = normalize_spaces(&format!("{} {}", prefix, record.particulars));
            self.state.pending_description.clear();
        }
        self.state.previous_balance = Some(record.balance);
        self.records.push(record);
    }

    pub fn on_fragment(&mut self, text: String) {
        self.state.pending_description.push(text);
    }

    /// Finish the pass: forward-fill dates and hand back the records.
    ///
    /// Fragments still pending after the last transaction are dropped.
    pub fn finish(mut self) -> Vec<TransactionRecord> {
        forward_fill_dates(&mut self.records);
        self.records
    }
}

/// Give every record with an empty date the nearest earlier non-empty date.
/// Records before the first dated one stay empty.
pub fn forward_fill_dates(records: &mut [TransactionRecord]) {
    let mut last = String::new();
    for record in records.iter_mut() {
        if record.date.is_empty() {
            record.date.clone_from(&last);
        } else {
            last.clone_from(&record.date);
        }
    }
}
