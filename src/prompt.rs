use minijinja::{context, Environment};

use crate::document::TextChunk;
use crate::error::Result;

pub const SYSTEM_PROMPT: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer \
the question. If you don’t know the answer, say that you \
don’t know. Use three sentences maximum and keep the \
answer concise.";

// System and human turns flattened for a plain completion model.
const TEMPLATE_NAME: &str = "qa_prompt";
const TEMPLATE: &str = "System: {{ system }}\n\n{{ context }}\nHuman: {{ input }}";

#[derive(Clone)]
pub struct PromptTemplate {
    env: Environment<'static>,
}

impl PromptTemplate {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, context: &[TextChunk], input: &str) -> Result<String> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(context! {
            system => SYSTEM_PROMPT,
            context => format_context(context),
            input => input,
        })?)
    }
}

/// Chunk texts separated by a blank line.
pub fn format_context(chunks: &[TextChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
