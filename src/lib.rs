//! # Coach Backend
//!
//! A chat backend for a marathon coach assistant.
//!
//! This library provides:
//! - An HTTP API (`POST /chat`) that answers a single user message
//! - A tool-calling loop over the OpenAI chat-completions API
//! - Two tools: current weather (OpenWeather) and recent runs (Strava)
//!
//! ## Architecture
//!
//! Each request is handled in one linear pass:
//! 1. Build the system prompt (with today's date) and the user message
//! 2. Call the model with the tool schemas
//! 3. Execute any requested tools and append their results
//! 4. Call the model once more, without tools, for the final answer
//!
//! ## Example
//!
//! ```rust,ignore
//! use coach_backend::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(&config);
//! let answer = agent.run_chat("How far did I run yesterday?").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
