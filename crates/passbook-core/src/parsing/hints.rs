use crate::config::schema::ParserConfig;

/// Keywords matched case-insensitively as plain substrings.
#[derive(Debug, Clone)]
pub struct HintSet {
    words: Vec<String>,
}

impl HintSet {
    pub fn new(words: &[String]) -> Self {
        HintSet {
            words: words.iter().map(|w| w.to_uppercase()).collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let upper = text.to_uppercase();
        self.words.iter().any(|w| upper.contains(w.as_str()))
    }
}

/// Credit and debit keyword vocabulary.
#[derive(Debug, Clone)]
pub struct DirectionHints {
    pub credit: HintSet,
    pub debit: HintSet,
}

impl DirectionHints {
    pub fn from_config(config: &ParserConfig) -> Self {
        DirectionHints {
            credit: HintSet::new(&config.credit_hints),
            debit: HintSet::new(&config.debit_hints),
        }
    }
}
