//! Text completion collaborator
//!
//! Turns a rendered prompt into generated text. The relay only depends on the
//! [`TextCompletion`] trait; the Vertex AI clients behind it are replaceable.

pub mod auth;
pub mod claude;
pub mod error;
pub mod gemini;
pub mod http;
pub mod provider;

pub use claude::{ClaudeClient, ClaudeModel};
pub use error::CompletionError;
pub use gemini::{GeminiClient, GeminiModel};
pub use provider::{create_completion, Model, TextCompletion};
