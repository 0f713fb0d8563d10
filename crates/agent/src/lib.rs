//! Answer refinement for the PetWorld catalog assistant.
//!
//! This crate turns a customer question plus a catalog snapshot into a
//! reviewed answer:
//! - Builds the writer and critic prompts (`prompts`)
//! - Interprets critic output as a verdict, failing open (`verdict`)
//! - Runs the bounded writer/critic loop (`refinement`)
//! - Talks to an OpenAI-compatible chat completions API (`openai`)
//!
//! # Architecture
//!
//! Writer and critic are two instruction framings over one [`llm::LlmClient`].
//! Each round generates a candidate, then asks the critic about it:
//! 1. **Generate** - catalog context + question (+ previous answer and feedback)
//! 2. **Evaluate** - question + candidate only
//! 3. **Decide** - approved stops the loop, otherwise the feedback feeds the next round
//!
//! # Failure policy
//!
//! A writer failure is fatal because there is nothing to show the customer.
//! A critic failure, or critic output that cannot be read, counts as approval.

pub mod llm;
pub mod openai;
pub mod prompts;
pub mod refinement;
pub mod verdict;

pub use llm::{CompletionRequest, LlmClient, LlmError};
pub use openai::OpenAiCompatibleClient;
pub use refinement::{Refinement, RefinementEngine, RefinementError, MAX_ITERATIONS};
pub use verdict::parse_verdict;
