//! joker-providers: chat-completion provider implementations for joker
//!
//! Both providers speak the OpenAI chat-completions wire format; the Azure
//! variant only differs in URL layout and authentication header.

pub mod azure;
pub mod openai;

pub use azure::AzureOpenAIProvider;
pub use openai::OpenAIProvider;
