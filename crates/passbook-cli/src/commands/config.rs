use passbook_core::config::builtin;
use passbook_core::error::PassbookError;
use std::path::Path;

pub fn list() -> Result<(), PassbookError> {
    println!("Available predefined configurations:\n");
    for name in builtin::PRESETS {
        let cfg = builtin::load_preset(name)?;
        println!("  {:<10} {} (v{})", name, cfg.name, cfg.version);
        if let Some(ref desc) = cfg.description {
            println!("             {}", desc);
        }
        println!(
            "             tolerance {}, line threshold {}px, {} credit / {} debit keywords",
            cfg.tolerance,
            cfg.line_threshold,
            cfg.credit_hints.len(),
            cfg.debit_hints.len()
        );
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), PassbookError> {
    // Validate first so unknown names report the available presets
    builtin::load_preset(preset)?;
    if let Some(json) = builtin::preset_json(preset) {
        print!("{json}");
    }
    Ok(())
}

pub fn schema() -> Result<(), PassbookError> {
    print!(
        r#"Parser Configuration Schema
===========================

A configuration file tells passbook how amounts, dates and debit/credit
keywords look on a family of bank statements. Start from
`passbook config show default` and adjust.

Top-level fields:
  name            (string, required)  Human-readable name
  description     (string, optional)  What layout this configuration targets
  version         (string, required)  Version identifier (e.g., "1.0")
  money_pattern   (string, required)  Regex for one amount. Matches touching
                                      another digit are ignored. Commas are
                                      removed before conversion.
  date_patterns   (array, required)   Regexes tried in order; the first one
                                      that matches anywhere on the line wins.
                                      Capture group 1 is the date if present.
  credit_hints    (array, required)   Keywords meaning money came in.
  debit_hints     (array, required)   Keywords meaning money went out.
                                      Both are matched case-insensitively as
                                      substrings; credit is checked first.
  direction_tags  (array, optional)   Trailing tokens removed from the
                                      description (e.g., "CR", "DR").
  cheque_patterns (array, optional)   Regexes whose group 1 is a cheque number.
  tolerance       (string, required)  Largest accepted difference when the
                                      balance change is compared with the
                                      amount (e.g., "0.01").
  line_threshold  (number, required)  Vertical distance in pixels within which
                                      OCR words belong to the same line.
  sign_window     (number, optional)  Characters before the amount searched
                                      for a minus sign. Default: 3
  context_window  (number, optional)  Characters around the amount searched
                                      for debit keywords on the first record.
                                      Default: 12

Direction is decided in this order: credit keyword, debit keyword, balance
change equal to +/- the amount, minus sign before the amount, and finally
credit.

Note: tolerance must be a quoted string, not a bare number, to preserve
exact decimal precision.
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), PassbookError> {
    let cfg = passbook_core::config::load_config(file)?;

    println!("Configuration '{}' (v{}) is valid.", cfg.name, cfg.version);
    println!("  Date grammars: {}", cfg.date_patterns.len());
    println!("  Credit keywords: {}", cfg.credit_hints.join(", "));
    println!("  Debit keywords: {}", cfg.debit_hints.join(", "));

    // Check for potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    for hint in &cfg.credit_hints {
        if cfg
            .debit_hints
            .iter()
            .any(|d| d.eq_ignore_ascii_case(hint))
        {
            warnings.push(format!(
                "keyword '{}' is both a credit and a debit hint; credit always wins",
                hint
            ));
        }
    }
    for hint in cfg.credit_hints.iter().chain(&cfg.debit_hints) {
        if hint.trim().chars().count() <= 2 {
            warnings.push(format!(
                "keyword '{}' is short and will also match inside longer words",
                hint
            ));
        }
    }
    if cfg.tolerance.is_zero() {
        warnings.push("tolerance is 0: recognition noise will defeat balance inference".into());
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
