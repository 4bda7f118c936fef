use crate::config::schema::ParserConfig;
use crate::error::PassbookError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A money-grammar match within a line.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyMatch<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    /// `None` when the matched numeral does not convert to a decimal.
    pub value: Option<Decimal>,
}

/// Compiled money, date and cheque grammars.
#[derive(Debug, Clone)]
pub struct Patterns {
    money: Regex,
    dates: Vec<Regex>,
    cheques: Vec<Regex>,
}

impl Patterns {
    pub fn compile(config: &ParserConfig) -> Result<Self, PassbookError> {
        Ok(Patterns {
            money: compile(&config.money_pattern)?,
            dates: config
                .date_patterns
                .iter()
                .map(|p| compile(p))
                .collect::<Result<_, _>>()?,
            cheques: config
                .cheque_patterns
                .iter()
                .map(|p| compile(p))
                .collect::<Result<_, _>>()?,
        })
    }

    /// All money amounts in the line, left to right.
    ///
    /// A candidate that touches another digit on either side is part of a
    /// longer numeral and is skipped; the scan resumes one character later.
    pub fn find_money<'a>(&self, line: &'a str) -> Vec<MoneyMatch<'a>> {
        let mut out = Vec::new();
        let mut pos = 0;

        while pos <= line.len() {
            let m = match self.money.find_at(line, pos) {
                Some(m) => m,
                None => break,
            };

            let digit_before = line[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit());
            let digit_after = line[m.end()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit());

            if m.is_empty() || digit_before || digit_after {
                pos = m.start() + line[m.start()..].chars().next().map_or(1, char::len_utf8);
                continue;
            }

            out.push(MoneyMatch {
                text: m.as_str(),
                start: m.start(),
                end: m.end(),
                value: parse_money(m.as_str()),
            });
            pos = m.end();
        }

        out
    }

    /// First date found by the highest-priority grammar that matches.
    pub fn find_date<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.dates.iter().find_map(|rx| first_group(rx, line))
    }

    pub fn find_cheque<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.cheques.iter().find_map(|rx| first_group(rx, line))
    }
}

/// Parse a comma-grouped, dot-decimal amount.
pub fn parse_money(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.trim().replace(',', "")).ok()
}

fn first_group<'a>(rx: &Regex, line: &'a str) -> Option<&'a str> {
    let caps = rx.captures(line)?;
    caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
}

fn compile(pattern: &str) -> Result<Regex, PassbookError> {
    Regex::new(pattern)
        .map_err(|e| PassbookError::ConfigInvalid(format!("invalid regex '{}': {}", pattern, e)))
}
