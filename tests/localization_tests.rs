//! # Localization Tests
//!
//! This module contains unit tests for the localization functionality,
//! testing message retrieval and formatting with various edge cases.

use what_to_cook::localization::{t, t_args, LocalizationManager};

const USED_KEYS: &[&str] = &[
    "welcome-title",
    "welcome-intro",
    "welcome-example1",
    "welcome-example2",
    "welcome-example3",
    "welcome-pricing",
    "help-title",
    "help-step1",
    "help-step2",
    "help-step3",
    "help-limits",
    "rate-limited",
    "quota-exceeded",
    "ask-health",
    "ask-diet",
    "recommendation-header",
    "recommendation-upsell",
    "no-dishes",
    "access-granted",
    "access-granted-hint",
    "access-already-granted",
    "access-thanks",
    "unsupported-message",
    "button-healthy-yes",
    "button-healthy-no",
    "button-diet-meat",
    "button-diet-fish",
    "button-diet-veg",
    "button-buy-access",
    "button-suggest-breakfast",
    "button-suggest-lunch",
    "button-suggest-dinner",
    "button-support",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        // Create a new localization manager for each test
        LocalizationManager::new()
    }

    #[test]
    fn test_all_used_keys_exist() {
        let manager = setup_localization();
        for key in USED_KEYS {
            assert!(manager.has_message(key), "missing message: {key}");
        }
    }

    #[test]
    fn test_get_message_existing_key() {
        assert_eq!(t("ask-health"), "Вы на правильном питании?");
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();
        let message = manager.get_message("nonexistent-key", None);
        assert!(message.starts_with("Missing translation:"));
    }

    #[test]
    fn test_get_message_with_args() {
        let message = t_args("quota-exceeded", &[("price", "299")]);
        assert_eq!(message, "🔓 Разблокируйте полный доступ за 299 ₽ — навсегда!");
    }

    #[test]
    fn test_no_bidi_isolation_marks() {
        let message = t_args("rate-limited", &[("seconds", "42")]);
        assert!(message.contains("42"));
        assert!(!message.contains('\u{2068}'));
        assert!(!message.contains('\u{2069}'));
    }

    #[test]
    fn test_broken_source_keeps_valid_entries() {
        let manager = LocalizationManager::from_source("ru", "good = Хорошо\nbad = { \n");
        assert_eq!(manager.get_message("good", None), "Хорошо");
        assert!(!manager.has_message("bad"));
    }
}
