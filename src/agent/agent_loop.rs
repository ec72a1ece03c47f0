//! Core chat loop implementation.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, LlmError, OpenAiClient, ToolCall};
use crate::tools::{ToolError, ToolRegistry};

use super::prompt::build_system_prompt;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// The marathon coach.
pub struct Agent {
    model: String,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

impl Agent {
    /// Create an agent talking to the configured OpenAI endpoint.
    pub fn new(config: &Config) -> Self {
        let llm = Arc::new(OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
        ));
        Self::with_client(config, llm)
    }

    /// Create an agent on top of an existing LLM client.
    pub fn with_client(config: &Config, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            model: config.model.clone(),
            llm,
            tools: ToolRegistry::new(config),
        }
    }

    /// Answer one user message, dated today on the local clock.
    pub async fn run_chat(&self, message: &str) -> Result<String, AgentError> {
        self.run_chat_on(message, Local::now().date_naive()).await
    }

    /// Answer one user message as if today were `today`.
    pub async fn run_chat_on(&self, message: &str, today: NaiveDate) -> Result<String, AgentError> {
        let mut messages = vec![
            ChatMessage::system(build_system_prompt(today)),
            ChatMessage::user(message),
        ];

        let tool_schemas = self.tools.get_tool_schemas();
        let response = self
            .llm
            .chat_completion(&self.model, &messages, Some(tool_schemas.as_slice()))
            .await?;

        let tool_calls = match response.tool_calls {
            Some(calls) if !calls.is_empty() => calls,
            _ => return Ok(response.content.unwrap_or_default()),
        };

        messages.push(ChatMessage::assistant(response.content, tool_calls.clone()));

        for tool_call in &tool_calls {
            tracing::info!(tool = %tool_call.function.name, id = %tool_call.id, "Tool triggered");
            let result = self.execute_tool_call(tool_call).await?;
            messages.push(ChatMessage::tool_result(tool_call.id.clone(), result));
        }

        let final_response = self
            .llm
            .chat_completion(&self.model, &messages, None)
            .await?;

        Ok(final_response.content.unwrap_or_default())
    }

    /// Execute a single tool call.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> Result<String, ToolError> {
        self.tools
            .execute(&tool_call.function.name, &tool_call.function.arguments)
            .await
    }
}
