pub mod builtin;
pub mod schema;

use crate::error::PassbookError;
use regex::Regex;
use schema::ParserConfig;
use std::path::Path;

/// Load a parser configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<ParserConfig, PassbookError> {
    let content = std::fs::read_to_string(path).map_err(|e| PassbookError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a parser configuration from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<ParserConfig, PassbookError> {
    let config: ParserConfig =
        serde_json::from_str(json).map_err(|e| PassbookError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a parser configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<ParserConfig, PassbookError> {
    let config: ParserConfig = serde_json::from_str(json).map_err(PassbookError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a parser configuration is well-formed.
pub fn validate_config(config: &ParserConfig) -> Result<(), PassbookError> {
    check_pattern("money_pattern", &config.money_pattern)?;

    if config.date_patterns.is_empty() {
        return Err(PassbookError::ConfigInvalid(
            "date_patterns must not be empty".into(),
        ));
    }
    for p in &config.date_patterns {
        check_pattern("date_patterns", p)?;
    }
    for p in &config.cheque_patterns {
        check_pattern("cheque_patterns", p)?;
    }

    if config.credit_hints.is_empty() || config.debit_hints.is_empty() {
        return Err(PassbookError::ConfigInvalid(
            "credit_hints and debit_hints must not be empty".into(),
        ));
    }
    if let Some(h) = config
        .credit_hints
        .iter()
        .chain(&config.debit_hints)
        .find(|h| h.trim().is_empty())
    {
        return Err(PassbookError::ConfigInvalid(format!(
            "blank keyword hint '{}'",
            h
        )));
    }
    if config.direction_tags.iter().any(|t| t.trim().is_empty()) {
        return Err(PassbookError::ConfigInvalid(
            "direction_tags must not contain blank entries".into(),
        ));
    }

    if config.tolerance.is_sign_negative() {
        return Err(PassbookError::ConfigInvalid(format!(
            "tolerance must not be negative (got {})",
            config.tolerance
        )));
    }
    if !(config.line_threshold.is_finite() && config.line_threshold > 0.0) {
        return Err(PassbookError::ConfigInvalid(format!(
            "line_threshold must be a positive number (got {})",
            config.line_threshold
        )));
    }

    Ok(())
}

fn check_pattern(field: &str, pattern: &str) -> Result<(), PassbookError> {
    if pattern.is_empty() {
        return Err(PassbookError::ConfigInvalid(format!(
            "{} contains an empty pattern",
            field
        )));
    }
    Regex::new(pattern).map_err(|e| {
        PassbookError::ConfigInvalid(format!("{} has invalid regex '{}': {}", field, pattern, e))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_json(tolerance: &str, threshold: &str, money: &str) -> String {
        format!(
            r#"{{
            "name": "Test",
            "version": "1.0",
            "money_pattern": "{money}",
            "date_patterns": ["\\d{{2}}/\\d{{2}}"],
            "credit_hints": ["CR"],
            "debit_hints": ["DR"],
            "tolerance": "{tolerance}",
            "line_threshold": {threshold}
        }}"#
        )
    }

    #[test]
    fn test_parse_valid_config() {
        let cfg = parse_config_str(&config_json("0.01", "10.0", r"\\d+\\.\\d{2}")).unwrap();
        assert_eq!(cfg.name, "Test");
        assert_eq!(cfg.sign_window, 3);
        assert_eq!(cfg.context_window, 12);
        assert!(cfg.direction_tags.is_empty());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(parse_config_str(&config_json("-1", "10.0", r"\\d+\\.\\d{2}")).is_err());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        assert!(parse_config_str(&config_json("0.01", "0", r"\\d+\\.\\d{2}")).is_err());
    }

    #[test]
    fn test_bad_regex_rejected() {
        let err = parse_config_str(&config_json("0.01", "10.0", r"(\\d+")).unwrap_err();
        assert!(matches!(err, PassbookError::ConfigInvalid(_)));
    }

    #[test]
    fn test_empty_hints_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "money_pattern": "\\d+\\.\\d{2}",
            "date_patterns": ["\\d+"],
            "credit_hints": [],
            "debit_hints": ["DR"],
            "tolerance": "0.01",
            "line_threshold": 10.0
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/passbook.json")).unwrap_err();
        assert!(matches!(err, PassbookError::ConfigLoad { .. }));
    }
}
