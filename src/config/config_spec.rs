use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EnvironmentProvider;
use crate::config::errors::ApplicationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

/// Configuration specification with environment override → default priority
///
/// Blank environment values count as unset.
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub env_override: Option<String>,
    pub default_value: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            min_length: None,
            max_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    /// Resolve the setting, or `None` when neither environment nor default provide it
    pub fn load_optional(&self) -> Result<Option<ConfigValue>, ApplicationError> {
        if let Some(env_var) = &self.env_override {
            let value = self
                .env_provider
                .get_var(env_var)
                .filter(|v| !v.trim().is_empty());
            if let Some(value) = value {
                self.validate_value(&value, env_var)?;
                return Ok(Some(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable {
                        name: env_var.clone(),
                    },
                }));
            }
        }

        if let Some(default) = &self.default_value {
            self.validate_value(default, self.setting_name())?;
            return Ok(Some(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            }));
        }

        Ok(None)
    }

    /// Resolve the setting, falling back to an empty value when it is optional and unset
    pub fn load_setting_with_source(&self) -> Result<ConfigValue, ApplicationError> {
        Ok(self.load_optional()?.unwrap_or(ConfigValue {
            value: String::new(),
            source: ConfigValueSource::Default,
        }))
    }

    /// Validate a setting value according to the ConfigSpec rules
    pub fn validate_value(&self, value: &str, setting_name: &str) -> Result<(), ApplicationError> {
        if let Some(min_len) = self.min_length {
            if value.chars().count() < min_len {
                return Err(ApplicationError::invalid_setting(
                    setting_name,
                    format!("Value must be at least {} characters long", min_len),
                ));
            }
        }

        if let Some(max_len) = self.max_length {
            if value.chars().count() > max_len {
                return Err(ApplicationError::invalid_setting(
                    setting_name,
                    format!("Value must be at most {} characters long", max_len),
                ));
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::invalid_setting(setting_name, reason))?;
        }

        Ok(())
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("unknown_setting")
    }
}

/// Type parsing utilities for configuration values
impl ConfigSpec {
    /// Parse an unsigned integer and check it against an inclusive range
    pub fn parse_u64_in_range(
        value: &str,
        setting_name: &str,
        range: RangeInclusive<u64>,
    ) -> Result<u64, ApplicationError> {
        let number = value.trim().parse::<u64>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected positive integer, got '{}': {}", value, e),
        })?;

        if !range.contains(&number) {
            return Err(ApplicationError::invalid_setting(
                setting_name,
                format!(
                    "Value {} is out of range ({}..={})",
                    number,
                    range.start(),
                    range.end()
                ),
            ));
        }

        Ok(number)
    }

    pub fn parse_duration_secs(
        value: &str,
        setting_name: &str,
        range: RangeInclusive<u64>,
    ) -> Result<Duration, ApplicationError> {
        Self::parse_u64_in_range(value, setting_name, range).map(Duration::from_secs)
    }

    pub fn parse_duration_millis(
        value: &str,
        setting_name: &str,
        range: RangeInclusive<u64>,
    ) -> Result<Duration, ApplicationError> {
        Self::parse_u64_in_range(value, setting_name, range).map(Duration::from_millis)
    }
}
