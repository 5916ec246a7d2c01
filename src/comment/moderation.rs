use crate::config::AppConfig;
use crate::utils::form::{FormErrors, REQUIRED};

/// Forbidden-word check for comment text.
#[derive(Debug, Clone)]
pub struct ModerationFilter {
    words: Vec<String>,
    warning: String,
}

impl ModerationFilter {
    pub fn new(words: Vec<String>, warning: String) -> Self {
        let words = words
            .into_iter()
            .map(|word| word.to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        ModerationFilter { words, warning }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        ModerationFilter::new(
            config.forbidden_words.clone(),
            config.moderation_warning.clone(),
        )
    }

    /// `Err` carries the message to show next to the text field.
    pub fn check(&self, text: &str) -> Result<(), String> {
        if text.trim().is_empty() {
            return Err(REQUIRED.to_string());
        }

        let lowered = text.to_lowercase();
        if self.words.iter().any(|word| lowered.contains(word.as_str())) {
            return Err(self.warning.clone());
        }

        Ok(())
    }

    pub fn validate(&self, text: &str) -> FormErrors {
        let mut errors = FormErrors::default();
        if let Err(message) = self.check(text) {
            errors.add("text", message);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ModerationFilter {
        ModerationFilter::from_config(&AppConfig::default())
    }

    #[test]
    fn clean_text_passes() {
        assert!(filter().check("This is a bad word").is_ok());
        assert!(filter().validate("Nice article").is_empty());
    }

    #[test]
    fn forbidden_words_match_case_insensitively_inside_text() {
        let filter = filter();
        assert_eq!(filter.check("Ты РЕДИСКА!"), Err("Не ругайтесь!".to_string()));
        assert!(filter.check("какой-то негодяйский текст").is_err());
        assert!(filter.validate("редиска").has("text"));
    }

    #[test]
    fn blank_text_is_required() {
        assert_eq!(filter().check("   "), Err(REQUIRED.to_string()));
    }

    #[test]
    fn custom_word_list() {
        let filter = ModerationFilter::new(vec!["Spam".into(), "".into()], "No spam".into());
        assert_eq!(filter.check("buy SPAM now"), Err("No spam".to_string()));
        assert!(filter.check("ham").is_ok());
    }
}
