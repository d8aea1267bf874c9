//! Engine and AI backend configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use quiz_core::{CuratedSource, DEFAULT_POOL_SIZE, SessionSettings};

use crate::error::ConfigError;

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Settings fixed for the lifetime of a `QuizEngine`.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub pool_size: usize,
    /// Applied to sessions created implicitly and to start requests that omit limits.
    pub defaults: SessionSettings,
    /// Seed for item and option shuffling; entropy when `None`.
    pub rng_seed: Option<u64>,
    pub explain_concurrency: usize,
    pub catalog: Vec<CuratedSource>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            defaults: SessionSettings::default(),
            rng_seed: None,
            explain_concurrency: 4,
            catalog: vec![CuratedSource::inheritance()],
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

//
// ─── AI BACKEND ────────────────────────────────────────────────────────────────
//

/// Which backend the tutor should use, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendSelection {
    /// First provider with a credential: OpenAI, then Anthropic, else offline.
    #[default]
    Auto,
    OpenAi,
    Anthropic,
    Disabled,
}

impl FromStr for BackendSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "off" | "offline" | "disabled" | "none" => Ok(Self::Disabled),
            _ => Err(ConfigError::UnknownBackend { raw: s.to_string() }),
        }
    }
}

/// Endpoint and credentials for one hosted model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Limits applied to every backend call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first failure.
    pub retries: u32,
    pub retry_pause: Duration,
    pub max_in_flight: usize,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(8),
            retries: 1,
            retry_pause: Duration::from_millis(300),
            max_in_flight: 4,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiConfig {
    pub selection: BackendSelection,
    pub openai: Option<ProviderConfig>,
    pub anthropic: Option<ProviderConfig>,
    pub policy: CallPolicy,
}

impl AiConfig {
    /// Configuration that never contacts a backend.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            selection: BackendSelection::Disabled,
            ..Self::default()
        }
    }

    /// Read the AI configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown backend name or a malformed number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the AI configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown backend name or a malformed number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let selection = lookup("QUIZ_AI_BACKEND")
            .map(|raw| raw.parse())
            .transpose()?
            .unwrap_or_default();

        let provider = |key_var: &str, url_var: &str, model_var: &str, url: &str, model: &str| {
            let api_key = lookup(key_var).filter(|key| !key.trim().is_empty())?;
            Some(ProviderConfig {
                base_url: lookup(url_var).unwrap_or_else(|| url.into()),
                api_key,
                model: lookup(model_var).unwrap_or_else(|| model.into()),
            })
        };
        let openai = provider(
            "OPENAI_API_KEY",
            "OPENAI_BASE_URL",
            "OPENAI_MODEL",
            "https://api.openai.com/v1",
            "gpt-4o-mini",
        );
        let anthropic = provider(
            "ANTHROPIC_API_KEY",
            "ANTHROPIC_BASE_URL",
            "ANTHROPIC_MODEL",
            "https://api.anthropic.com/v1",
            "claude-3-5-sonnet-20241022",
        );

        let defaults = CallPolicy::default();
        let number = |var: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(var)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidNumber { var, raw })
                })
                .transpose()
        };
        let policy = CallPolicy {
            timeout: number("QUIZ_AI_TIMEOUT_SECS")?.map_or(defaults.timeout, Duration::from_secs),
            retries: number("QUIZ_AI_RETRIES")?
                .map_or(defaults.retries, |n| u32::try_from(n).unwrap_or(u32::MAX)),
            retry_pause: defaults.retry_pause,
            max_in_flight: number("QUIZ_AI_MAX_IN_FLIGHT")?.map_or(defaults.max_in_flight, |n| {
                usize::try_from(n).unwrap_or(usize::MAX).max(1)
            }),
        };

        Ok(Self {
            selection,
            openai,
            anthropic,
            policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_auto_without_providers() {
        let config = AiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.selection, BackendSelection::Auto);
        assert!(config.openai.is_none());
        assert!(config.anthropic.is_none());
        assert_eq!(config.policy, CallPolicy::default());
    }

    #[test]
    fn credentials_enable_providers_with_default_models() {
        let config = AiConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("ANTHROPIC_API_KEY", "  "),
            ("QUIZ_AI_BACKEND", "OpenAI"),
        ]))
        .unwrap();
        assert_eq!(config.selection, BackendSelection::OpenAi);
        let openai = config.openai.unwrap();
        assert_eq!(openai.model, "gpt-4o-mini");
        assert_eq!(openai.base_url, "https://api.openai.com/v1");
        assert!(config.anthropic.is_none(), "blank key counts as absent");
    }

    #[test]
    fn call_policy_overrides_are_parsed() {
        let config = AiConfig::from_lookup(lookup(&[
            ("QUIZ_AI_TIMEOUT_SECS", "3"),
            ("QUIZ_AI_RETRIES", "0"),
            ("QUIZ_AI_MAX_IN_FLIGHT", "0"),
        ]))
        .unwrap();
        assert_eq!(config.policy.timeout, Duration::from_secs(3));
        assert_eq!(config.policy.retries, 0);
        assert_eq!(config.policy.max_in_flight, 1);
    }

    #[test]
    fn bad_values_are_reported() {
        let err = AiConfig::from_lookup(lookup(&[("QUIZ_AI_BACKEND", "gemini")])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend { .. }));

        let err = AiConfig::from_lookup(lookup(&[("QUIZ_AI_RETRIES", "-1")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                var: "QUIZ_AI_RETRIES",
                ..
            }
        ));
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!(
            "off".parse::<BackendSelection>().unwrap(),
            BackendSelection::Disabled
        );
        assert_eq!(
            "anthropic".parse::<BackendSelection>().unwrap(),
            BackendSelection::Anthropic
        );
        assert_eq!(
            "auto".parse::<BackendSelection>().unwrap(),
            BackendSelection::Auto
        );
    }
}
