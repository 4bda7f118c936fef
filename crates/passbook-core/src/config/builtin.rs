use crate::config::parse_config_str;
use crate::config::schema::ParserConfig;
use crate::error::PassbookError;

const DEFAULT_JSON: &str = include_str!("../../../../presets/default.json");

/// Available predefined parser configurations.
pub const PRESETS: &[&str] = &["default"];

/// Load a predefined parser configuration by name.
pub fn load_preset(name: &str) -> Result<ParserConfig, PassbookError> {
    match name {
        "default" => parse_config_str(DEFAULT_JSON),
        _ => Err(PassbookError::ConfigInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// Raw JSON of a preset, for `config show`.
pub fn preset_json(name: &str) -> Option<&'static str> {
    match name {
        "default" => Some(DEFAULT_JSON),
        _ => None,
    }
}
