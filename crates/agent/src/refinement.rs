use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use petworld_core::domain::critique::CriticVerdict;
use petworld_core::domain::product::Product;

use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::prompts::{
    critic_prompt, format_product_context, writer_prompt, PriorRound, CRITIC_INSTRUCTIONS,
    WRITER_INSTRUCTIONS,
};
use crate::verdict::parse_verdict_strict;

pub const MAX_ITERATIONS: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Refinement {
    pub answer: String,
    /// Writer/critic rounds actually run, always `1..=max_iterations`.
    pub iterations: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefinementError {
    #[error("answer generation failed in round {iteration}: {source}")]
    Generation {
        iteration: u32,
        #[source]
        source: LlmError,
    },
}

/// Bounded writer/critic loop.
///
/// Holds no per-call state, so one engine (and its pooled client) serves every request.
pub struct RefinementEngine {
    llm: Arc<dyn LlmClient>,
    max_iterations: u32,
}

impl RefinementEngine {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm, max_iterations: MAX_ITERATIONS }
    }

    /// Override the round budget. Values below one are raised to one.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub async fn refine(
        &self,
        question: &str,
        products: &[Product],
    ) -> Result<Refinement, RefinementError> {
        let product_context = format_product_context(products);
        let mut prior: Option<PriorRound> = None;

        for iteration in 1..=self.max_iterations {
            let candidate =
                self.generate(question, &product_context, prior.as_ref(), iteration).await?;
            let verdict = self.evaluate(question, &candidate, iteration).await;

            if verdict.approved {
                info!(
                    event_name = "agent.refinement.approved",
                    iteration,
                    max_iterations = self.max_iterations,
                    "critic approved answer"
                );
                return Ok(Refinement { answer: candidate, iterations: iteration });
            }

            debug!(
                event_name = "agent.refinement.round",
                iteration,
                feedback_len = verdict.feedback.len(),
                "critic requested another round"
            );
            prior = Some(PriorRound { answer: candidate, feedback: verdict.feedback });
        }

        info!(
            event_name = "agent.refinement.exhausted",
            max_iterations = self.max_iterations,
            "round budget exhausted, returning last candidate"
        );
        Ok(Refinement {
            answer: prior.map(|round| round.answer).unwrap_or_default(),
            iterations: self.max_iterations,
        })
    }

    async fn generate(
        &self,
        question: &str,
        product_context: &str,
        prior: Option<&PriorRound>,
        iteration: u32,
    ) -> Result<String, RefinementError> {
        let request =
            CompletionRequest::new(WRITER_INSTRUCTIONS, writer_prompt(question, product_context, prior));

        let text = self.llm.complete(&request).await.map_err(|source| {
            warn!(
                event_name = "agent.refinement.writer_failed",
                iteration,
                error = %source,
                "writer could not produce a candidate"
            );
            RefinementError::Generation { iteration, source }
        })?;

        let candidate = text.trim();
        if candidate.is_empty() {
            warn!(event_name = "agent.refinement.writer_failed", iteration, "writer returned empty text");
            return Err(RefinementError::Generation { iteration, source: LlmError::EmptyResponse });
        }

        Ok(candidate.to_string())
    }

    /// Never fails: transport errors and unreadable output both count as approval.
    async fn evaluate(&self, question: &str, candidate: &str, iteration: u32) -> CriticVerdict {
        let request = CompletionRequest::new(CRITIC_INSTRUCTIONS, critic_prompt(question, candidate));

        match self.llm.complete(&request).await {
            Ok(text) => parse_verdict_strict(&text).unwrap_or_else(|| {
                warn!(
                    event_name = "agent.refinement.critic_degraded",
                    iteration,
                    reason = "unparseable_verdict",
                    "critic output unreadable, approving"
                );
                CriticVerdict::fail_open()
            }),
            Err(error) => {
                warn!(
                    event_name = "agent.refinement.critic_degraded",
                    iteration,
                    reason = "transport",
                    error = %error,
                    "critic unavailable, approving"
                );
                CriticVerdict::fail_open()
            }
        }
    }
}
