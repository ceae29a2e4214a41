//! Working-view construction for each model call.
//!
//! The view is never stored: it is rebuilt from memory before every THINK
//! and SUMMARIZE call, framed by the system prompt and a trailing directive.

use std::collections::HashSet;

use toolweave_core::types::Message;

use crate::tools::TERMINATE_TOOL;

// ─────────────────────────────────────────────
// Prompts
// ─────────────────────────────────────────────

pub const SYSTEM_PROMPT: &str = "You are a capable assistant that solves the user's request \
step by step. You can call the tools you are given. Call a tool whenever it gives a more \
reliable answer than guessing, and read its result before deciding what to do next.";

pub const NEXT_STEP_PROMPT: &str = "Based on the conversation so far, decide on the next \
step. Call one or more tools if they help. If the task is complete, call the `terminate` \
tool, or answer directly without calling any tool.";

pub const FINAL_STEP_PROMPT: &str = "The task has ended. Do not call any tools. Write the \
final answer for the user, based on the tool results above.";

/// Which directive closes the working view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    NextStep,
    FinalStep,
}

impl Directive {
    pub fn prompt(self) -> &'static str {
        match self {
            Directive::NextStep => NEXT_STEP_PROMPT,
            Directive::FinalStep => FINAL_STEP_PROMPT,
        }
    }
}

// ─────────────────────────────────────────────
// ContextBuilder
// ─────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ContextBuilder {
    system_prompt: String,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ContextBuilder {
    /// `system_prompt` overrides [`SYSTEM_PROMPT`] when set and non-blank.
    pub fn new(system_prompt: Option<&str>) -> Self {
        let system_prompt = match system_prompt.map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.to_string(),
            _ => SYSTEM_PROMPT.to_string(),
        };
        Self { system_prompt }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the full message list for a model call.
    ///
    /// 1. System prompt
    /// 2. Memory snapshot, minus tool results whose call was evicted
    /// 3. Directive as a user message
    pub fn build_messages(&self, history: &[Message], directive: Directive) -> Vec<Message> {
        let answered = announced_call_ids(history);

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(
            history
                .iter()
                .filter(|m| match m.tool_call_id() {
                    Some(id) => answered.contains(id),
                    None => true,
                })
                .cloned(),
        );
        messages.push(Message::user(directive.prompt()));
        messages
    }
}

/// Call ids announced by assistant messages still in the window.
///
/// A tool result whose id is not in this set lost its assistant message to
/// eviction; providers reject such a message anywhere in the request.
fn announced_call_ids(history: &[Message]) -> HashSet<&str> {
    history
        .iter()
        .flat_map(|m| m.tool_calls())
        .map(|call| call.id.as_str())
        .collect()
}

/// Whether the name is the reserved terminate tool.
pub fn is_terminate(name: &str) -> bool {
    name == TERMINATE_TOOL
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolweave_core::types::ToolCall;

    #[test]
    fn test_default_system_prompt() {
        let ctx = ContextBuilder::default();
        assert_eq!(ctx.system_prompt(), SYSTEM_PROMPT);
        assert_eq!(ContextBuilder::new(Some("   ")).system_prompt(), SYSTEM_PROMPT);
    }

    #[test]
    fn test_custom_system_prompt() {
        let ctx = ContextBuilder::new(Some("  You are a calculator.\n"));
        let msgs = ctx.build_messages(&[], Directive::NextStep);
        assert_eq!(msgs[0].content(), Some("You are a calculator."));
    }

    #[test]
    fn test_build_messages_frames_history() {
        let ctx = ContextBuilder::default();
        let history = vec![Message::user("add 2 and 3"), Message::assistant("5")];
        let msgs = ctx.build_messages(&history, Directive::NextStep);
        // system + 2 history + directive = 4
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[0].role(), "system");
        assert_eq!(msgs[1].content(), Some("add 2 and 3"));
        assert_eq!(msgs[3].role(), "user");
        assert_eq!(msgs[3].content(), Some(NEXT_STEP_PROMPT));
    }

    #[test]
    fn test_final_directive() {
        let msgs = ContextBuilder::default().build_messages(&[], Directive::FinalStep);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].content(), Some(FINAL_STEP_PROMPT));
    }

    #[test]
    fn test_orphaned_tool_results_skipped() {
        let history = vec![
            Message::tool_result("call_1", "5"),
            Message::tool_result("call_2", "6"),
            Message::user("next"),
            Message::assistant_tool_calls(vec![ToolCall::new("call_3", "add", "{}")]),
            Message::tool_result("call_3", "0"),
        ];
        let msgs = ContextBuilder::default().build_messages(&history, Directive::NextStep);
        // system + 3 kept + directive
        assert_eq!(msgs.len(), 5);
        assert_eq!(msgs[1].content(), Some("next"));
        assert_eq!(msgs[3].tool_call_id(), Some("call_3"));
    }

    #[test]
    fn test_only_tool_results_yields_empty_history() {
        let history = vec![Message::tool_result("call_1", "5")];
        let msgs = ContextBuilder::default().build_messages(&history, Directive::NextStep);
        assert_eq!(msgs.len(), 2);
    }

    #[test]
    fn test_orphan_behind_failure_notice_skipped() {
        let history = vec![
            Message::assistant("Tool `search` failed: not registered. Consider a different tool."),
            Message::tool_result("call_2", "6"),
            Message::user("next"),
        ];
        let msgs = ContextBuilder::default().build_messages(&history, Directive::NextStep);
        let roles: Vec<_> = msgs.iter().map(|m| m.role()).collect();
        assert_eq!(roles, vec!["system", "assistant", "user", "user"]);
    }

    #[test]
    fn test_every_tool_result_has_its_call() {
        // Eviction left call_1's result but not its assistant message.
        let history = vec![
            Message::tool_result("call_1", "5"),
            Message::assistant("Tool `add` failed: overflow. Consider a different tool."),
            Message::tool_result("call_1", "late"),
            Message::assistant_tool_calls(vec![
                ToolCall::new("call_2", "add", "{}"),
                ToolCall::new("call_3", "terminate", "{}"),
            ]),
            Message::tool_result("call_2", "0"),
            Message::tool_result("call_3", "done"),
        ];
        let msgs = ContextBuilder::default().build_messages(&history, Directive::NextStep);
        let announced: Vec<&str> = msgs
            .iter()
            .flat_map(|m| m.tool_calls())
            .map(|c| c.id.as_str())
            .collect();
        let results: Vec<&str> = msgs.iter().filter_map(|m| m.tool_call_id()).collect();
        assert_eq!(results, vec!["call_2", "call_3"]);
        assert!(results.iter().all(|id| announced.contains(id)));
    }

    #[test]
    fn test_is_terminate() {
        assert!(is_terminate("terminate"));
        assert!(!is_terminate("Terminate"));
    }
}
