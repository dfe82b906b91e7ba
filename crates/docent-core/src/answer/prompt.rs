//! Prompt assembly for context-grounded answers.
//!
//! The system prompt pins the model to the retrieved passages: answer
//! from them alone, and say so when they don't contain the answer. The
//! user prompt lists the passages numbered, with their source names,
//! above the question.

use docent_types::retrieval::ScoredChunk;

/// System prompt mandating context-only answers.
pub const SYSTEM_PROMPT: &str = "You are docent, an assistant that answers \
questions about a document collection. Answer using only the context \
passages provided in the user message. If the answer is not in the context, \
politely say you do not have that information. Do not invent facts.";

/// Build the user prompt: numbered context passages, then the question.
pub fn build_user_prompt(question: &str, context: &[ScoredChunk]) -> String {
    let mut prompt = String::new();

    if context.is_empty() {
        prompt.push_str("No context passages were retrieved.\n\n");
    } else {
        prompt.push_str("Context passages:\n\n");
        for (i, scored) in context.iter().enumerate() {
            prompt.push_str(&format!(
                "[{}] (from {})\n{}\n\n",
                i + 1,
                scored.chunk.source,
                scored.chunk.text.trim()
            ));
        }
    }

    prompt.push_str(&format!("Question: {question}"));
    prompt
}
