//! Versioned prompt templates.
//!
//! Templates are configuration data, not ad-hoc strings: each carries a
//! versioned name and the set of variables it requires, and the whole
//! registry is validated at startup so a template drifting out of sync with
//! its variables fails fast instead of producing a malformed prompt.

use crate::error::PipelineError;

/// A named, versioned prompt template with `{variable}` placeholders.
pub struct PromptTemplate {
    pub name: &'static str,
    pub text: &'static str,
    pub variables: &'static [&'static str],
}

/// Rephrases a follow-up question into a standalone one using the chat
/// history. Used only when history is non-empty.
pub const CONDENSE_QUESTION: PromptTemplate = PromptTemplate {
    name: "condense-question@v1",
    text: "\
Given the following conversation and a follow up question, rephrase the \
follow up question to be a standalone question.

Chat History:
{chat_history}

Follow Up Input: {question}
Standalone question:",
    variables: &["chat_history", "question"],
};

/// Answers a question strictly from retrieved context, falling back to the
/// most relevant partial answer (flagged as such), and only then to the
/// precise technical reason nothing could be found.
pub const GROUNDED_ANSWER: PromptTemplate = PromptTemplate {
    name: "grounded-answer@v1",
    text: "\
Answer the question based on the context provided.
If you cannot find the answer in the context, give the answer from the most \
relevant part of the context you can find, and state clearly that it is \
only partially supported by the documents.
If there is no relevant content at all, tell the exact reason why you \
cannot find the answer and keep the reason short and simple. The user is a \
developer, so an exact technical reason helps them fix the issue.

Context:
{context}

Question: {question}

Answer the question in a detailed and helpful way. If possible, cite \
specific information from the context.

Answer:",
    variables: &["context", "question"],
};

/// Every template the crate ships. Startup validation walks this list.
pub const REGISTRY: &[&PromptTemplate] = &[&CONDENSE_QUESTION, &GROUNDED_ANSWER];

impl PromptTemplate {
    /// Substitute `{variable}` placeholders. Every declared variable must be
    /// supplied; unknown names in `vars` are rejected.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, PipelineError> {
        for (name, _) in vars {
            if !self.variables.contains(name) {
                return Err(self.error(format!("unknown variable '{name}'")));
            }
        }

        let mut out = self.text.to_string();
        for required in self.variables {
            let value = vars
                .iter()
                .find(|(name, _)| name == required)
                .map(|(_, value)| *value)
                .ok_or_else(|| self.error(format!("missing variable '{required}'")))?;
            out = out.replace(&format!("{{{required}}}"), value);
        }
        Ok(out)
    }

    /// Check the template text against its declared variable set: every
    /// declared variable must appear, and no undeclared placeholder may.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for required in self.variables {
            if !self.text.contains(&format!("{{{required}}}")) {
                return Err(self.error(format!("declared variable '{required}' never used")));
            }
        }
        for placeholder in placeholders(self.text) {
            if !self.variables.contains(&placeholder.as_str()) {
                return Err(self.error(format!("undeclared placeholder '{placeholder}'")));
            }
        }
        Ok(())
    }

    fn error(&self, reason: String) -> PipelineError {
        PipelineError::Template {
            name: self.name.to_string(),
            reason,
        }
    }
}

/// Validate the whole registry; called once at startup.
pub fn validate_registry() -> Result<(), PipelineError> {
    for template in REGISTRY {
        template.validate()?;
    }
    Ok(())
}

/// Scan for `{identifier}` placeholders.
fn placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = text[i + 1..].find('}') {
                let inner = &text[i + 1..i + 1 + end];
                if !inner.is_empty()
                    && inner
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    found.push(inner.to_string());
                }
                i += end + 2;
                continue;
            }
        }
        i += 1;
    }
    found
}
