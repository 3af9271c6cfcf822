use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::docsearch::Retrieve;
use crate::document::TextChunk;
use crate::error::Result;
use crate::llm::CompletionModel;
use crate::prompt::PromptTemplate;

#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub input: String,
    pub context: Vec<TextChunk>,
    pub answer: String,
}

#[async_trait]
pub trait AnswerChain: Send + Sync {
    async fn invoke(&self, input: &str) -> Result<ChainOutput>;
}

/// Retrieve, stuff every retrieved chunk into the prompt, complete.
pub struct RagChain {
    retriever: Arc<dyn Retrieve>,
    llm: Arc<dyn CompletionModel>,
    prompt: PromptTemplate,
}

impl RagChain {
    pub fn new(
        retriever: Arc<dyn Retrieve>,
        llm: Arc<dyn CompletionModel>,
        prompt: PromptTemplate,
    ) -> Self {
        Self {
            retriever,
            llm,
            prompt,
        }
    }
}

#[async_trait]
impl AnswerChain for RagChain {
    #[instrument(skip(self))]
    async fn invoke(&self, input: &str) -> Result<ChainOutput> {
        let context = self.retriever.retrieve(input).await?;
        let prompt = self.prompt.render(&context, input)?;
        let answer = self.llm.complete(&prompt).await?;
        info!("Answered with {} context chunks", context.len());

        Ok(ChainOutput {
            input: input.to_string(),
            context,
            answer,
        })
    }
}
