use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use log::{error, warn};
use std::sync::LazyLock;
use unic_langid::LanguageIdentifier;

const DEFAULT_LOCALE: &str = "ru";
const RU_MESSAGES: &str = include_str!("../locales/ru/main.ftl");

/// Message catalog for all user-facing text
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a manager from the messages embedded into the binary
    pub fn new() -> Self {
        Self::from_source(DEFAULT_LOCALE, RU_MESSAGES)
    }

    /// Create a manager from Fluent source. Syntax errors are logged and the
    /// entries that did parse stay usable.
    pub fn from_source(locale: &str, source: &str) -> Self {
        let langid: LanguageIdentifier = locale.parse().unwrap_or_default();
        let mut bundle = FluentBundle::new_concurrent(vec![langid]);
        // Telegram shows bidi isolation marks literally
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(source.to_string()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                error!("Fluent syntax errors in '{}' messages: {:?}", locale, errors);
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!("Fluent resource conflicts in '{}' messages: {:?}", locale, errors);
        }

        Self { bundle }
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!("Formatting '{}' reported errors: {:?}", key, errors);
        }
        value.into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(*value));
        }
        self.get_message(key, Some(&fluent_args))
    }

    pub fn has_message(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }
}

impl Default for LocalizationManager {
    fn default() -> Self {
        Self::new()
    }
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(LocalizationManager::new);

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    get_localization_manager().get_message(key, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    get_localization_manager().get_message_with_args(key, args)
}
