mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use coach_backend::agent::{Agent, AgentError};
use coach_backend::llm::{LlmError, Role, ToolCall};
use coach_backend::tools::{ToolError, ToolId, SIMULATED_WEATHER, STRAVA_KEYS_MISSING, UNKNOWN_TOOL_RESULT};

use common::{calls, test_config, text, ScriptedLlm};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 17).unwrap()
}

fn agent(llm: &Arc<ScriptedLlm>) -> Agent {
    Agent::with_client(&test_config(), llm.clone())
}

#[tokio::test]
async fn direct_answer_skips_tools() {
    let llm = Arc::new(ScriptedLlm::new(vec![text("Rest today, easy 5k tomorrow.")]));

    let answer = agent(&llm).run_chat_on("Should I run today?", today()).await.unwrap();

    assert_eq!(answer, "Rest today, easy 5k tomorrow.");
    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gpt-4o-mini");
    assert_eq!(calls[0].messages.len(), 2);
    assert_eq!(calls[0].messages[0].role, Role::System);
    assert!(calls[0].messages[0]
        .content
        .as_deref()
        .unwrap()
        .contains("Today is Wednesday, December 17, 2025."));
    assert_eq!(calls[0].messages[1].role, Role::User);
    assert_eq!(calls[0].messages[1].content.as_deref(), Some("Should I run today?"));
    assert_eq!(calls[0].tools.as_ref().map(Vec::len), Some(2));
}

#[tokio::test]
async fn single_tool_call_builds_ordered_history() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        calls(vec![ToolCall::new("call_w1", "get_weather", r#"{"city":"Berlin"}"#)]),
        text("Sunny and warm, perfect for a long run."),
    ]));

    let answer = agent(&llm)
        .run_chat_on("What's the weather in Berlin?", today())
        .await
        .unwrap();

    assert_eq!(answer, "Sunny and warm, perfect for a long run.");
    let calls = llm.calls();
    assert_eq!(calls.len(), 2);

    let history = &calls[1].messages;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0], calls[0].messages[0]);
    assert_eq!(history[1], calls[0].messages[1]);

    assert_eq!(history[2].role, Role::Assistant);
    let requested = history[2].tool_calls.as_ref().unwrap();
    assert_eq!(requested.len(), 1);
    assert_eq!(requested[0].id, "call_w1");

    assert_eq!(history[3].role, Role::Tool);
    assert_eq!(history[3].tool_call_id.as_deref(), Some("call_w1"));
    assert_eq!(history[3].content.as_deref(), Some(SIMULATED_WEATHER));

    assert!(calls[1].tools.is_none());
}

#[tokio::test]
async fn tool_results_follow_request_order() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        calls(vec![
            ToolCall::new("call_s", "get_strava_stats", "{}"),
            ToolCall::new("call_w", "get_weather", r#"{"city":"Oslo"}"#),
        ]),
        text("done"),
    ]));

    agent(&llm).run_chat_on("Runs and weather?", today()).await.unwrap();

    let history = &llm.calls()[1].messages;
    assert_eq!(history.len(), 5);
    assert_eq!(history[3].tool_call_id.as_deref(), Some("call_s"));
    assert_eq!(history[3].content.as_deref(), Some(STRAVA_KEYS_MISSING));
    assert_eq!(history[4].tool_call_id.as_deref(), Some("call_w"));
    assert_eq!(history[4].content.as_deref(), Some(SIMULATED_WEATHER));
}

#[tokio::test]
async fn unknown_tool_still_gets_final_answer() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        calls(vec![ToolCall::new("call_x", "get_heart_rate", "{}")]),
        text("I can't see your heart rate."),
    ]));

    let answer = agent(&llm).run_chat_on("What's my HR?", today()).await.unwrap();

    assert_eq!(answer, "I can't see your heart rate.");
    let calls = llm.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].messages[3].content.as_deref(), Some(UNKNOWN_TOOL_RESULT));
    assert_eq!(calls[1].messages[3].tool_call_id.as_deref(), Some("call_x"));
}

#[tokio::test]
async fn malformed_arguments_abort_the_request() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        calls(vec![ToolCall::new("call_bad", "get_weather", "{city: Berlin")]),
        text("never sent"),
    ]));

    let err = agent(&llm).run_chat_on("Weather?", today()).await.unwrap_err();

    assert!(matches!(
        err,
        AgentError::Tool(ToolError::MalformedArguments {
            tool: ToolId::GetWeather,
            ..
        })
    ));
    assert_eq!(llm.calls().len(), 1);
}

#[tokio::test]
async fn model_failure_propagates() {
    let llm = Arc::new(ScriptedLlm::new(vec![Err(LlmError::Api {
        status: 401,
        body: "invalid api key".to_string(),
    })]));

    let err = agent(&llm).run_chat_on("Hi", today()).await.unwrap_err();

    assert!(matches!(err, AgentError::Llm(LlmError::Api { status: 401, .. })));
}

#[tokio::test]
async fn empty_tool_call_list_is_a_direct_answer() {
    let llm = Arc::new(ScriptedLlm::new(vec![Ok(coach_backend::llm::ChatResponse {
        content: Some("Nothing to look up.".to_string()),
        tool_calls: Some(Vec::new()),
    })]));

    let answer = agent(&llm).run_chat_on("Hello", today()).await.unwrap();

    assert_eq!(answer, "Nothing to look up.");
    assert_eq!(llm.calls().len(), 1);
}
