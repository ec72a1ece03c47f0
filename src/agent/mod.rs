//! Agent module - the chat orchestration loop.
//!
//! One request runs at most two model calls:
//! 1. Send the system prompt and user message with the available tools
//! 2. If the model requests tool calls, execute them in order and append the results
//! 3. Send the extended conversation again, without tools, for the final answer

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, AgentError};
pub use prompt::build_system_prompt;
