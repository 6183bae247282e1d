//! Tutor Dispatch
//!
//! Ties the relevance gate and the LLM client together: acknowledgements get
//! a canned redirect, admitted queries are generated through the LLM and
//! recorded on the session, rejected queries get the fixed refusal.

use crate::gate::{GateDecision, RelevanceGate};
use crate::llm_client::LLMClient;
use crate::session::SessionContext;
use crate::syllabus::Syllabus;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Reply for acknowledgement queries; the LLM is never involved.
pub const REDIRECT_REPLY: &str =
    "Got it! What would you like to learn next in web development?";

/// Reply for queries the gate rejects.
pub const REFUSAL_REPLY: &str = "I'm here to help with web development topics. \
    Could you ask something related to HTML, CSS, or frontend development?";

/// Placeholder in the system-prompt template that the rendered syllabus
/// replaces.
pub const SYLLABUS_PLACEHOLDER: &str = "{syllabus_topics}";

/// Substitutes the rendered syllabus into the persona template.
///
/// Pure function of its inputs; called once at startup so every request sees
/// the same instruction text.
pub fn render_system_prompt(template: &str, syllabus: &Syllabus) -> String {
    template.replace(SYLLABUS_PLACEHOLDER, &syllabus.render_topic_lines())
}

/// The per-request entry point: gate first, then generate or refuse.
pub struct TutorService {
    gate: RelevanceGate,
    llm: Arc<dyn LLMClient>,
    system_prompt: String,
}

impl TutorService {
    pub fn new(gate: RelevanceGate, llm: Arc<dyn LLMClient>, system_prompt: String) -> Self {
        Self {
            gate,
            llm,
            system_prompt,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Produces the reply for one user turn.
    ///
    /// Only a successful generation mutates the session; canned replies leave
    /// it untouched. Embedding or generation failures propagate to the caller.
    pub async fn chat(&self, session: &mut SessionContext, query: &str) -> Result<String> {
        let decision = self.gate.evaluate(query, session).await?;
        debug!(?decision, "Gate decision");

        match decision {
            GateDecision::Acknowledgement => Ok(REDIRECT_REPLY.to_string()),
            GateDecision::Continuation | GateDecision::OnTopic => {
                let reply = self
                    .llm
                    .complete(&self.system_prompt, query)
                    .await
                    .context("Chat completion failed")?;
                session.record_reply(reply.clone());
                Ok(reply)
            }
            GateDecision::OffTopic => Ok(REFUSAL_REPLY.to_string()),
        }
    }
}
