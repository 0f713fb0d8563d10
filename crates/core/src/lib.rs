//! Domain model, configuration and error taxonomy shared by the PetWorld crates.

pub mod config;
pub mod domain;
pub mod errors;

pub use domain::conversation::{ConversationId, ConversationRecord, NewConversation};
pub use domain::critique::CriticVerdict;
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
