use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::fallback;
use super::provider::{AnthropicProvider, CompletionProvider, OpenAiProvider, Prompt};
use crate::config::{AiConfig, BackendSelection, CallPolicy};
use crate::error::TutorError;

const OFFLINE: &str = "offline";

/// Hints and explanations, backed by an optional hosted model.
///
/// Every call resolves to text. A backend that keeps failing after the
/// configured retries is switched off for the rest of the process.
pub struct TutorService {
    provider: Option<Arc<dyn CompletionProvider>>,
    policy: CallPolicy,
    degraded: AtomicBool,
    permits: Semaphore,
}

impl TutorService {
    /// Pick a backend from `config`: the explicit selection, or for `Auto` the
    /// first provider with credentials (OpenAI, then Anthropic).
    #[must_use]
    pub fn from_config(config: &AiConfig) -> Self {
        let openai = || {
            config
                .openai
                .clone()
                .map(|c| Arc::new(OpenAiProvider::new(c)) as Arc<dyn CompletionProvider>)
        };
        let anthropic = || {
            config
                .anthropic
                .clone()
                .map(|c| Arc::new(AnthropicProvider::new(c)) as Arc<dyn CompletionProvider>)
        };
        let provider = match config.selection {
            BackendSelection::Disabled => None,
            BackendSelection::OpenAi => openai(),
            BackendSelection::Anthropic => anthropic(),
            BackendSelection::Auto => openai().or_else(anthropic),
        };
        let tutor = Self::build(provider, config.policy);
        info!(backend = tutor.backend_name(), "tutor backend selected");
        tutor
    }

    #[must_use]
    pub fn offline() -> Self {
        Self::build(None, CallPolicy::default())
    }

    #[must_use]
    pub fn with_provider(provider: Arc<dyn CompletionProvider>, policy: CallPolicy) -> Self {
        Self::build(Some(provider), policy)
    }

    fn build(provider: Option<Arc<dyn CompletionProvider>>, policy: CallPolicy) -> Self {
        Self {
            provider,
            policy,
            degraded: AtomicBool::new(false),
            permits: Semaphore::new(policy.max_in_flight.max(1)),
        }
    }

    /// `openai`, `anthropic`, or `offline` once degraded or when none was configured.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.active()
            .map_or(OFFLINE, |provider| provider.kind().name())
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    pub async fn generate_hint(
        &self,
        text: &str,
        options: &[String],
        subskill: Option<&str>,
    ) -> String {
        let prompt = fallback::hint_prompt(text, options, subskill);
        match self.call(&prompt).await {
            Some(hint) => hint,
            None => fallback::hint(subskill),
        }
    }

    pub async fn generate_explanation(
        &self,
        text: &str,
        options: &[String],
        correct_index: usize,
        chosen_index: usize,
    ) -> String {
        let prompt = fallback::explanation_prompt(text, options, correct_index, chosen_index);
        match self.call(&prompt).await {
            Some(explanation) => explanation,
            None => fallback::explanation(options, correct_index, chosen_index),
        }
    }

    fn active(&self) -> Option<&Arc<dyn CompletionProvider>> {
        if self.is_degraded() {
            return None;
        }
        self.provider.as_ref()
    }

    /// One logical call: bounded by the semaphore, each attempt bounded by the
    /// timeout. `None` means use offline text.
    async fn call(&self, prompt: &Prompt) -> Option<String> {
        let provider = Arc::clone(self.active()?);
        let _permit = self.permits.acquire().await.ok()?;

        let mut last_error = TutorError::EmptyResponse;
        for attempt in 0..=self.policy.retries {
            let outcome =
                tokio::time::timeout(self.policy.timeout, provider.complete(prompt)).await;
            match outcome {
                Ok(Ok(text)) if !text.trim().is_empty() => return Some(text.trim().to_string()),
                Ok(Ok(_)) | Ok(Err(TutorError::EmptyResponse)) => return None,
                Ok(Err(err)) => last_error = err,
                Err(_) => last_error = TutorError::Timeout(self.policy.timeout),
            }
            debug!(attempt, error = %last_error, "tutor backend call failed");
            if attempt < self.policy.retries {
                tokio::time::sleep(self.policy.retry_pause).await;
            }
        }

        self.degrade(provider.kind().name(), &last_error);
        None
    }

    fn degrade(&self, backend: &str, error: &TutorError) {
        if !self.degraded.swap(true, Ordering::AcqRel) {
            warn!(backend, %error, "tutor backend degraded to offline text");
        }
    }
}
