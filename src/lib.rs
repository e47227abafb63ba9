//! A Gemini-backed chat and code-analysis assistant.
//!
//! [`Gemini`] sends single prompts to the `generateContent` API.  The
//! [`chat::ChatTerminal`] drives an interactive session on a host terminal,
//! and [`Assistant`] maps host commands onto it.  The host itself is
//! abstracted by the traits in [`host`].

// Public modules
pub mod assistant;
pub mod chat;
pub mod clean;
pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod observability;
pub mod prompts;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use assistant::{Assistant, HostCommand};
pub use clean::clean;
pub use client::{Gemini, Generator};
pub use config::{ConfigLoader, GeminiConfig};
pub use error::{Error, Result};
pub use observability::register_biometrics;
