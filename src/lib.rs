//! modelgate: one request shape for several hosted LLM providers
//!
//! The core is [`services`]: a registry that validates a (provider, model) pair and
//! builds an adapter implementing [`services::ModelAdapter`]. The [`gateway`] serves
//! that registry over HTTP, and the [`client`], [`prompts`] and [`cli`] modules make
//! up the command-line front-ends that talk to it.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::too_many_lines)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod prompts;
pub mod services;

// Re-exports for convenience
pub use error::{GateError, Result};
