use crate::model::{money, DirectionBasis, Movement, TransactionRecord};
use crate::parsing::normalize::{chars_after, chars_before, has_alphabetic, normalize_spaces};
use crate::parsing::patterns::MoneyMatch;
use crate::parsing::StatementParser;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// What a single line contributes to the statement.
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    /// A date with no amounts; leftover text becomes a description fragment.
    DateOnly {
        date: String,
        residual: Option<String>,
    },
    /// Amount and balance found; a complete record before stitching.
    Transaction(TransactionRecord),
    /// Description text for the next transaction.
    Fragment(String),
    /// Nothing usable (blank, numbers only).
    Discard,
}

impl StatementParser {
    /// Classify one line given the balance of the previous record.
    pub fn classify_line(&self, line: &str, previous_balance: Option<Decimal>) -> LineClass {
        let norm = normalize_spaces(line);
        let monies = self.patterns.find_money(&norm);

        if monies.is_empty() {
            if let Some(date) = self.patterns.find_date(&norm) {
                let residual = normalize_spaces(&norm.replace(date, ""));
                let residual = residual.trim_matches(|c: char| matches!(c, ' ' | '-' | '–' | '—'));
                return LineClass::DateOnly {
                    date: date.to_string(),
                    residual: (!residual.is_empty()).then(|| residual.to_string()),
                };
            }
        }

        match self.parse_transaction(&norm, line, &monies, previous_balance) {
            Some(record) => LineClass::Transaction(record),
            None if has_alphabetic(&norm) => LineClass::Fragment(norm),
            None => LineClass::Discard,
        }
    }

    /// Build a record from the two rightmost money matches.
    ///
    /// Returns `None` for fewer than two matches, when either of them does
    /// not convert to a decimal, or when the amount is zero: a record must
    /// move money in one direction.
    fn parse_transaction(
        &self,
        line: &str,
        raw: &str,
        monies: &[MoneyMatch<'_>],
        previous_balance: Option<Decimal>,
    ) -> Option<TransactionRecord> {
        let [.., amount_m, balance_m] = monies else {
            return None;
        };

        let (amount, balance) = match (amount_m.value, balance_m.value) {
            (Some(a), Some(b)) => (money(a), money(b)),
            _ => {
                warn!(line, "amount or balance numeral does not convert; line rejected");
                return None;
            }
        };

        if amount.is_zero() {
            debug!(line, "zero amount; not a transaction");
            return None;
        }

        let (movement, basis) =
            self.infer_direction(line, amount_m, amount, balance, previous_balance);
        debug!(line, %movement, %balance, basis = %basis, "transaction line");

        Some(TransactionRecord {
            date: self
                .patterns
                .find_date(line)
                .unwrap_or_default()
                .to_string(),
            particulars: self.particulars(line, balance_m.text, amount_m.text),
            movement,
            balance,
            cheque_number: self.patterns.find_cheque(line).map(str::to_string),
            direction_basis: basis,
            raw: raw.to_string(),
        })
    }

    fn infer_direction(
        &self,
        line: &str,
        amount_m: &MoneyMatch<'_>,
        amount: Decimal,
        balance: Decimal,
        previous_balance: Option<Decimal>,
    ) -> (Movement, DirectionBasis) {
        if self.hints.credit.matches(line) {
            return (Movement::Credit(amount), DirectionBasis::CreditHint);
        }
        if self.hints.debit.matches(line) {
            return (Movement::Debit(amount), DirectionBasis::DebitHint);
        }

        match previous_balance {
            Some(previous) => {
                let diff = balance - previous;
                if (diff - amount).abs() <= self.tolerance {
                    (Movement::Credit(amount), DirectionBasis::BalanceDelta)
                } else if (diff + amount).abs() <= self.tolerance {
                    (Movement::Debit(amount), DirectionBasis::BalanceDelta)
                } else if chars_before(line, amount_m.start, self.sign_window).contains('-') {
                    (Movement::Debit(amount), DirectionBasis::SignProximity)
                } else {
                    (Movement::Credit(amount), DirectionBasis::DefaultCredit)
                }
            }
            // Any hint inside the window is also on the line and matched
            // above, so in practice this arm yields the default credit.
            None => {
                let context = format!(
                    "{} {}",
                    chars_before(line, amount_m.start, self.context_window),
                    chars_after(line, amount_m.end, self.context_window)
                );
                if self.hints.debit.matches(&context) {
                    (Movement::Debit(amount), DirectionBasis::ContextHint)
                } else {
                    (Movement::Credit(amount), DirectionBasis::DefaultCredit)
                }
            }
        }
    }

    /// Text before the amount, with a trailing CR/DR tag removed.
    fn particulars(&self, line: &str, balance_text: &str, amount_text: &str) -> String {
        let head = cut_at_last(line, balance_text);
        let head = cut_at_last(head, amount_text);
        match &self.tag_strip {
            Some(rx) => normalize_spaces(&rx.replace(head, "")),
            None => normalize_spaces(head),
        }
    }
}

fn cut_at_last<'a>(s: &'a str, needle: &str) -> &'a str {
    s.rfind(needle).map_or(s, |i| &s[..i])
}
