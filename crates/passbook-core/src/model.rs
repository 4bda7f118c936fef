use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money movement of a single transaction line.
///
/// A record moves money in exactly one direction, so debit and credit can
/// never both be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "direction", content = "amount", rename_all = "lowercase")]
pub enum Movement {
    Debit(Decimal),
    Credit(Decimal),
}

impl Movement {
    pub fn amount(&self) -> Decimal {
        match self {
            Movement::Debit(v) | Movement::Credit(v) => *v,
        }
    }

    pub fn is_debit(&self) -> bool {
        matches!(self, Movement::Debit(_))
    }

    /// Signed effect on the running balance (debits negative).
    pub fn signed(&self) -> Decimal {
        match self {
            Movement::Debit(v) => -*v,
            Movement::Credit(v) => *v,
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Movement::Debit(v) => write!(f, "DR {v}"),
            Movement::Credit(v) => write!(f, "CR {v}"),
        }
    }
}

/// Which rule decided the direction of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionBasis {
    /// A credit keyword appeared on the line.
    CreditHint,
    /// A debit keyword appeared on the line.
    DebitHint,
    /// Balance moved by exactly the amount (within tolerance).
    BalanceDelta,
    /// A minus sign sat right before the amount.
    SignProximity,
    /// A debit keyword appeared near the amount on the first record.
    ///
    /// Not produced in practice: the window is a slice of the line, and the
    /// line-wide debit keyword check runs first. Kept so every step of the
    /// first-record rule has a basis.
    ContextHint,
    /// Nothing conclusive; credit assumed.
    DefaultCredit,
}

impl fmt::Display for DirectionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DirectionBasis::CreditHint => "credit keyword",
            DirectionBasis::DebitHint => "debit keyword",
            DirectionBasis::BalanceDelta => "balance delta",
            DirectionBasis::SignProximity => "minus sign",
            DirectionBasis::ContextHint => "keyword near amount",
            DirectionBasis::DefaultCredit => "default credit",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Date as printed; empty when none was seen yet.
    pub date: String,
    pub particulars: String,
    pub movement: Movement,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_number: Option<String>,
    pub direction_basis: DirectionBasis,
    /// Source line, untouched.
    pub raw: String,
}

impl TransactionRecord {
    pub fn debit(&self) -> Decimal {
        match self.movement {
            Movement::Debit(v) => money(v),
            Movement::Credit(_) => money(Decimal::ZERO),
        }
    }

    pub fn credit(&self) -> Decimal {
        match self.movement {
            Movement::Credit(v) => money(v),
            Movement::Debit(_) => money(Decimal::ZERO),
        }
    }
}

/// Rescale to exactly two fractional digits.
pub fn money(v: Decimal) -> Decimal {
    let mut v = v.round_dp(2);
    v.rescale(2);
    v
}

/// Which extraction tier produced the lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    Text,
    Ocr,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Text => write!(f, "text"),
            ExtractionMode::Ocr => write!(f, "ocr"),
        }
    }
}

/// Aggregate figures over a parsed statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub record_count: usize,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub opening_balance: Option<Decimal>,
    pub closing_balance: Option<Decimal>,
    /// Adjacent pairs whose balance change does not equal the movement.
    pub balance_breaks: usize,
}

impl StatementSummary {
    pub fn from_records(records: &[TransactionRecord], tolerance: Decimal) -> Self {
        let total_debit = records.iter().map(|r| r.debit()).sum::<Decimal>();
        let total_credit = records.iter().map(|r| r.credit()).sum::<Decimal>();
        let balance_breaks = records
            .windows(2)
            .filter(|pair| {
                let delta = pair[1].balance - pair[0].balance;
                (delta - pair[1].movement.signed()).abs() > tolerance
            })
            .count();

        StatementSummary {
            record_count: records.len(),
            total_debit: money(total_debit),
            total_credit: money(total_credit),
            opening_balance: records.first().map(|r| r.balance),
            closing_balance: records.last().map(|r| r.balance),
            balance_breaks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedStatement {
    pub mode: ExtractionMode,
    /// Normalized lines of the text layer.
    pub text_lines: Vec<String>,
    /// Lines clustered from positioned words; empty unless that tier ran.
    pub ocr_lines: Vec<String>,
    pub records: Vec<TransactionRecord>,
}

impl ParsedStatement {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lines of the tier that produced the records.
    pub fn lines(&self) -> &[String] {
        match self.mode {
            ExtractionMode::Text => &self.text_lines,
            ExtractionMode::Ocr => &self.ocr_lines,
        }
    }
}
