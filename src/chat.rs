use std::sync::Arc;

use colored::*;
use serde_json::Value;

use crate::api::{make_api_request, process_streaming_response, RequestBody};
use crate::api::response::{extract_content, parse_tool_calls};
use crate::config::Config;
use crate::error::{Result, WayfarerError};
use crate::memory::ChatMemory;
use crate::models::Message;
use crate::tools::{call_tool, format_tools_for_model, ToolRegistry};
use crate::ui::{display_content, display_tool_error, display_tool_result};

pub struct ChatContext {
    pub config: Config,
    pub memory: Arc<dyn ChatMemory>,
    pub tools: Option<ToolRegistry>,
}

/// Run one conversation turn: rehydrate the transcript from memory, call the
/// model (with the tool loop when tools are attached), and append the turn's
/// messages back into memory under the conversation id.
///
/// Memory is written here, on the model-invocation path; the history store
/// only tracks which conversations exist and reconciles memory on delete and
/// clear.
pub async fn run_turn(
    context: &ChatContext,
    category: &str,
    chat_id: &str,
    prompt: &str,
) -> Result<String> {
    let mut messages = context.memory.messages(chat_id);
    let mut turn_messages: Vec<Message> = Vec::new();

    // First contact for this conversation gets the category's system prompt
    if messages.is_empty() {
        let system = Message::system(format!(
            "Today's date is {}.\n\n{}",
            Config::get_current_date(),
            context.config.system_prompt(category)
        ));
        messages.push(system.clone());
        turn_messages.push(system);
    }

    let user = Message::user(prompt);
    messages.push(user.clone());
    turn_messages.push(user);

    let tools = context
        .tools
        .as_ref()
        .map(format_tools_for_model)
        .filter(|t| !t.is_empty());

    if context.config.verbose {
        if let Some(ref registry) = context.tools {
            let tool_names: Vec<String> =
                registry.list().iter().map(|t| t.name.clone()).collect();
            eprintln!(
                "{}",
                format!("[tools] Available tools: {}", tool_names.join(", ")).dimmed()
            );
        }
        eprintln!(
            "{}",
            format!("[ai] Using model: {}", context.config.model).dimmed()
        );
    }

    // Stream plain replies; tool calls need the complete response body
    let use_streaming = tools.is_none();

    let request_body = RequestBody {
        model: context.config.model.clone(),
        messages: messages.clone(),
        stream: use_streaming,
        tools,
    };

    let response = make_api_request(
        &context.config.api_key,
        &context.config.api_endpoint,
        &request_body,
    )
    .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(WayfarerError::ApiError {
            status,
            message: error_text,
        });
    }

    let answer = if use_streaming {
        process_streaming_response(response, context.config.stream_timeout, context.config.verbose)
            .await?
            .content
    } else {
        let response_text = response.text().await?;
        let response_json: Value = serde_json::from_str(&response_text)?;
        process_tool_response(context, response_json, &mut messages, &mut turn_messages).await?
    };

    if !answer.is_empty() {
        turn_messages.push(Message::assistant(answer.clone()));
    }
    context.memory.add(chat_id, turn_messages);

    Ok(answer)
}

async fn process_tool_response(
    context: &ChatContext,
    response_json: Value,
    messages: &mut Vec<Message>,
    turn_messages: &mut Vec<Message>,
) -> Result<String> {
    if let Some(tool_calls) = parse_tool_calls(&response_json)? {
        if context.config.verbose {
            eprintln!("{}", "[ai] Executing requested tools...".dimmed());
        }

        let tool_results = execute_tool_calls(context, &tool_calls).await;

        if !tool_results.is_empty() {
            // Record the assistant's tool-call turn, then the tool results
            let content = extract_content(&response_json)?;
            let tool_calls_typed: Vec<crate::models::ToolCall> = tool_calls
                .iter()
                .filter_map(|tc| serde_json::from_value(tc.clone()).ok())
                .collect();
            let assistant_turn = Message {
                role: crate::models::Role::Assistant,
                content,
                tool_calls: if tool_calls_typed.is_empty() {
                    None
                } else {
                    Some(tool_calls_typed)
                },
                tool_call_id: None,
            };
            messages.push(assistant_turn.clone());
            turn_messages.push(assistant_turn);
            for result in tool_results {
                messages.push(result.clone());
                turn_messages.push(result);
            }

            // Follow-up request for the final reply, streamed, without tools
            let followup_request = RequestBody {
                model: context.config.model.clone(),
                messages: messages.clone(),
                stream: true,
                tools: None,
            };

            let followup_response = make_api_request(
                &context.config.api_key,
                &context.config.api_endpoint,
                &followup_request,
            )
            .await?;

            if !followup_response.status().is_success() {
                let status = followup_response.status().as_u16();
                let error_text = followup_response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(WayfarerError::ApiError {
                    status,
                    message: error_text,
                });
            }

            let followup = process_streaming_response(
                followup_response,
                context.config.stream_timeout,
                context.config.verbose,
            )
            .await?;

            return Ok(followup.content);
        }
    }

    // No tool calls, the reply is in the message content
    match extract_content(&response_json)? {
        Some(content) => {
            display_content(&content);
            Ok(content)
        }
        None => {
            if context.config.verbose {
                eprintln!(
                    "{}",
                    "[ai] Response carried neither tool calls nor content.".dimmed()
                );
            }
            Ok(String::new())
        }
    }
}

async fn execute_tool_calls(context: &ChatContext, tool_calls: &[Value]) -> Vec<Message> {
    let mut tool_results = Vec::new();

    for tool_call in tool_calls {
        let id = tool_call
            .get("id")
            .and_then(|i| i.as_str())
            .unwrap_or("unknown");
        let function = tool_call.get("function");
        let name = function
            .and_then(|f| f.get("name"))
            .and_then(|n| n.as_str());
        let arguments_str = function
            .and_then(|f| f.get("arguments"))
            .and_then(|a| a.as_str());

        let (Some(name), Some(arguments_str)) = (name, arguments_str) else {
            eprintln!(
                "{}",
                format!("Warning: Malformed tool call {}, skipping", id).yellow()
            );
            tool_results.push(Message::tool(
                format!("Error: Tool call {} is missing its function name or arguments", id),
                id,
            ));
            continue;
        };

        println!("{}", format!("Calling tool: {}...", name).cyan());

        let arguments = match serde_json::from_str::<Value>(arguments_str) {
            Ok(arguments) => arguments,
            Err(err) => {
                let error_text =
                    format!("Error: failed to parse arguments for tool '{}': {}", name, err);
                display_tool_error(name, &error_text);
                tool_results.push(Message::tool(error_text, id));
                continue;
            }
        };

        let Some(registry) = context.tools.as_ref().filter(|r| r.get(name).is_some()) else {
            let error_text = format!("Error: Tool '{}' not found", name);
            display_tool_error(name, &error_text);
            tool_results.push(Message::tool(error_text, id));
            continue;
        };

        match call_tool(registry, name, &arguments).await {
            Ok(result_text) => {
                display_tool_result(name, &result_text);
                tool_results.push(Message::tool(result_text, id));
            }
            Err(e) => {
                let error_text = format!("Error: {}", e);
                display_tool_error(name, &error_text);
                tool_results.push(Message::tool(error_text, id));
            }
        }
    }

    tool_results
}
