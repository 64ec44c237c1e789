//! Engine configuration.

use std::time::Duration;

use plover_core::{DEFAULT_TEMPLATES_NO_AGE, DEFAULT_TEMPLATES_WITH_AGE};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval between rescan passes.
    pub rescan_interval: Duration,
    /// How many days to search backward for past birthdays.
    pub past_birthdays_day_range: u32,
    /// How many days to search forward for upcoming birthdays.
    pub upcoming_birthdays_day_range: u32,
    /// Message templates used when the user's age is not disclosed.
    pub templates_no_age: Vec<String>,
    /// Message templates used when the user's age is disclosed.
    pub templates_with_age: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rescan_interval: Duration::from_secs(24 * 60 * 60),
            past_birthdays_day_range: 7,
            upcoming_birthdays_day_range: 14,
            templates_no_age: DEFAULT_TEMPLATES_NO_AGE
                .iter()
                .map(|s| s.to_string())
                .collect(),
            templates_with_age: DEFAULT_TEMPLATES_WITH_AGE
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the rescan interval.
    pub fn with_rescan_interval(mut self, interval: Duration) -> Self {
        self.rescan_interval = interval;
        self
    }

    /// Builder: set the past/upcoming search ranges for display queries.
    pub fn with_day_ranges(mut self, past: u32, upcoming: u32) -> Self {
        self.past_birthdays_day_range = past;
        self.upcoming_birthdays_day_range = upcoming;
        self
    }

    /// Builder: replace both message template pools.
    pub fn with_templates(mut self, no_age: Vec<String>, with_age: Vec<String>) -> Self {
        self.templates_no_age = no_age;
        self.templates_with_age = with_age;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.rescan_interval, Duration::from_secs(86_400));
        assert_eq!(config.past_birthdays_day_range, 7);
        assert_eq!(config.upcoming_birthdays_day_range, 14);
        assert!(!config.templates_no_age.is_empty());
        assert!(!config.templates_with_age.is_empty());
    }

    #[test]
    fn builder_methods() {
        let config = EngineConfig::new()
            .with_rescan_interval(Duration::from_secs(60))
            .with_day_ranges(3, 5)
            .with_templates(vec!["a".into()], vec!["b".into()]);

        assert_eq!(config.rescan_interval, Duration::from_secs(60));
        assert_eq!(config.past_birthdays_day_range, 3);
        assert_eq!(config.upcoming_birthdays_day_range, 5);
        assert_eq!(config.templates_no_age, vec!["a".to_string()]);
        assert_eq!(config.templates_with_age, vec!["b".to_string()]);
    }
}
