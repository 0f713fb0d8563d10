//! PetWorld chat server: bootstrap wiring, the question-answering service, and its HTTP surfaces.

pub mod bootstrap;
pub mod chat;
pub mod health;
pub mod web;

pub use bootstrap::{bootstrap_with_config, bootstrap_with_llm, Application, BootstrapError};
pub use chat::{ChatError, ChatResponse, ChatService};
