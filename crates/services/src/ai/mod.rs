pub mod fallback;
pub mod provider;
mod tutor;

pub use provider::{AnthropicProvider, CompletionProvider, OpenAiProvider, Prompt, ProviderKind};
pub use tutor::TutorService;
