// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::MessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

/// Report offer returned by the assistant. The backend sends the option and
/// month lists; the client never invents entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPrompt {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub months: Vec<String>,
}

/// Per-prompt sub-form state. Lives in the message so a second prompt later
/// in the log keeps its own cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportFormState {
    pub option_index: usize,
    pub month_index: usize,
    pub generating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Loading,
    Text(String),
    ReportPrompt(ReportPrompt, ReportFormState),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub content: MessageContent,
}

/// Decoded assistant reply, after the transport layer has normalized errors
/// into plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReplyContent {
    Text(String),
    ReportPrompt(ReportPrompt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatSendOutcome {
    /// Empty or whitespace-only input, nothing appended.
    Rejected,
    /// A request is already awaiting its reply; nothing appended.
    Busy,
    /// No session token; the log already holds the local error reply.
    NoSession,
    /// The caller owns the network call for this id.
    Dispatch { request_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    request_id: u64,
    placeholder: MessageId,
}

/// Append-only chat transcript plus the single in-flight request slot.
///
/// Responses settle through [`ChatLog::resolve`] / [`ChatLog::fail`]; a
/// response carrying anything but the current in-flight id is dropped, which
/// is what keeps a late or duplicate reply from landing in the log after its
/// exchange has already settled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    in_flight: Option<InFlight>,
    next_request_id: u64,
    next_message_id: i64,
}

impl ChatLog {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_awaiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Appends the user's message and opens the in-flight slot. Refused with
    /// [`ChatSendOutcome::Busy`] while a reply is still outstanding, so the
    /// log never holds two pending placeholders.
    pub fn begin_request(&mut self, input: &str, has_token: bool) -> ChatSendOutcome {
        let input = input.trim();
        if input.is_empty() {
            return ChatSendOutcome::Rejected;
        }
        if self.in_flight.is_some() {
            return ChatSendOutcome::Busy;
        }

        self.push(ChatRole::User, MessageContent::Text(input.to_owned()));

        if !has_token {
            self.push(
                ChatRole::Bot,
                MessageContent::Error("sign in to use the assistant".to_owned()),
            );
            return ChatSendOutcome::NoSession;
        }

        let request_id = self.next_request_id();
        let placeholder = self.push(ChatRole::Bot, MessageContent::Loading);
        self.in_flight = Some(InFlight {
            request_id,
            placeholder,
        });
        ChatSendOutcome::Dispatch { request_id }
    }

    /// Settles the placeholder for `request_id` with the decoded reply.
    /// Returns false when the id is stale and nothing changed.
    pub fn resolve(&mut self, request_id: u64, reply: ChatReplyContent) -> bool {
        let Some(in_flight) = self.take_if_current(request_id) else {
            return false;
        };
        let content = match reply {
            ChatReplyContent::Text(text) => MessageContent::Text(text),
            ChatReplyContent::ReportPrompt(prompt) => {
                MessageContent::ReportPrompt(prompt, ReportFormState::default())
            }
        };
        self.settle(in_flight.placeholder, content);
        true
    }

    /// Settles the placeholder for `request_id` with an error message.
    /// Returns false when the id is stale and nothing changed.
    pub fn fail(&mut self, request_id: u64, error: impl Into<String>) -> bool {
        let Some(in_flight) = self.take_if_current(request_id) else {
            return false;
        };
        self.settle(in_flight.placeholder, MessageContent::Error(error.into()));
        true
    }

    /// Marks the report prompt in `message_id` as generating. Refused while
    /// a generation for that message is already running.
    pub fn begin_report(&mut self, message_id: MessageId) -> bool {
        match self.report_form_mut(message_id) {
            Some(form) if !form.generating => {
                form.generating = true;
                true
            }
            _ => false,
        }
    }

    pub fn finish_report(&mut self, message_id: MessageId) {
        if let Some(form) = self.report_form_mut(message_id) {
            form.generating = false;
        }
    }

    /// Clears the generating flag and appends the failure as a fresh bot
    /// message. The originating prompt stays usable for a retry.
    pub fn fail_report(&mut self, message_id: MessageId, error: impl Into<String>) {
        self.finish_report(message_id);
        self.push(ChatRole::Bot, MessageContent::Error(error.into()));
    }

    pub fn cycle_report_option(&mut self, message_id: MessageId, delta: isize) {
        if let Some((prompt, form)) = self.report_prompt_mut(message_id) {
            form.option_index = cycle(form.option_index, prompt.options.len(), delta);
        }
    }

    pub fn cycle_report_month(&mut self, message_id: MessageId, delta: isize) {
        if let Some((prompt, form)) = self.report_prompt_mut(message_id) {
            form.month_index = cycle(form.month_index, prompt.months.len(), delta);
        }
    }

    /// The selected (option, month) pair for the prompt in `message_id`.
    pub fn report_selection(&self, message_id: MessageId) -> Option<(&str, &str)> {
        let message = self.messages.iter().find(|m| m.id == message_id)?;
        let MessageContent::ReportPrompt(prompt, form) = &message.content else {
            return None;
        };
        let option = prompt.options.get(form.option_index)?;
        let month = prompt.months.get(form.month_index)?;
        Some((option.as_str(), month.as_str()))
    }

    fn push(&mut self, role: ChatRole, content: MessageContent) -> MessageId {
        self.next_message_id += 1;
        let id = MessageId::new(self.next_message_id);
        self.messages.push(ChatMessage { id, role, content });
        id
    }

    fn settle(&mut self, placeholder: MessageId, content: MessageContent) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == placeholder) {
            message.content = content;
        }
    }

    fn take_if_current(&mut self, request_id: u64) -> Option<InFlight> {
        match self.in_flight {
            Some(in_flight) if in_flight.request_id == request_id => self.in_flight.take(),
            _ => None,
        }
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.saturating_add(1);
        if self.next_request_id == 0 {
            self.next_request_id = 1;
        }
        self.next_request_id
    }

    fn report_form_mut(&mut self, message_id: MessageId) -> Option<&mut ReportFormState> {
        self.report_prompt_mut(message_id).map(|(_, form)| form)
    }

    fn report_prompt_mut(
        &mut self,
        message_id: MessageId,
    ) -> Option<(&ReportPrompt, &mut ReportFormState)> {
        let message = self.messages.iter_mut().find(|m| m.id == message_id)?;
        match &mut message.content {
            MessageContent::ReportPrompt(prompt, form) => Some((&*prompt, form)),
            _ => None,
        }
    }
}

fn cycle(index: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::{
        ChatLog, ChatReplyContent, ChatRole, ChatSendOutcome, MessageContent, ReportPrompt,
    };
    use crate::MessageId;

    fn sample_prompt() -> ReportPrompt {
        ReportPrompt {
            title: "Generate a report?".to_owned(),
            options: vec!["sales".to_owned(), "inventory".to_owned()],
            months: vec!["2026-07".to_owned(), "2026-08".to_owned()],
        }
    }

    fn dispatch(log: &mut ChatLog, input: &str) -> u64 {
        match log.begin_request(input, true) {
            ChatSendOutcome::Dispatch { request_id } => request_id,
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    fn prompt_message_id(log: &ChatLog) -> MessageId {
        log.messages()
            .iter()
            .find(|m| matches!(m.content, MessageContent::ReportPrompt(..)))
            .map(|m| m.id)
            .expect("report prompt in log")
    }

    #[test]
    fn blank_input_is_rejected_without_side_effects() {
        let mut log = ChatLog::default();
        assert_eq!(log.begin_request("   ", true), ChatSendOutcome::Rejected);
        assert!(log.messages().is_empty());
        assert!(!log.is_awaiting());
    }

    #[test]
    fn missing_token_answers_locally() {
        let mut log = ChatLog::default();
        assert_eq!(
            log.begin_request("how much milk is left?", false),
            ChatSendOutcome::NoSession,
        );
        assert_eq!(log.messages().len(), 2);
        assert_eq!(log.messages()[0].role, ChatRole::User);
        assert!(matches!(
            log.messages()[1].content,
            MessageContent::Error(_)
        ));
        assert!(!log.is_awaiting());
    }

    #[test]
    fn dispatch_inserts_loading_placeholder() {
        let mut log = ChatLog::default();
        let id = dispatch(&mut log, "stock levels?");
        assert!(id > 0);
        assert!(log.is_awaiting());
        assert_eq!(log.messages().len(), 2);
        assert_eq!(log.messages()[1].content, MessageContent::Loading);
    }

    #[test]
    fn resolve_replaces_placeholder_in_place() {
        let mut log = ChatLog::default();
        let id = dispatch(&mut log, "stock levels?");
        assert!(log.resolve(id, ChatReplyContent::Text("**12** units".to_owned())));
        assert!(!log.is_awaiting());
        assert_eq!(log.messages().len(), 2);
        assert_eq!(
            log.messages()[1].content,
            MessageContent::Text("**12** units".to_owned()),
        );
    }

    #[test]
    fn send_is_refused_while_awaiting_a_reply() {
        let mut log = ChatLog::default();
        let id = dispatch(&mut log, "first question");
        let before = log.messages().len();

        assert_eq!(
            log.begin_request("second question", true),
            ChatSendOutcome::Busy,
        );
        // The refusal leaves the log untouched and the first request alive.
        assert_eq!(log.messages().len(), before);
        assert!(log.is_awaiting());
        assert_eq!(log.messages()[1].content, MessageContent::Loading);

        assert!(log.resolve(id, ChatReplyContent::Text("answer".to_owned())));
        assert!(matches!(
            log.begin_request("second question", true),
            ChatSendOutcome::Dispatch { .. },
        ));
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut log = ChatLog::default();
        let first = dispatch(&mut log, "first question");
        assert!(log.fail(first, "chat request failed: timed out"));

        let second = dispatch(&mut log, "second question");
        assert_ne!(first, second);

        // A late reply for the settled first request must not land anywhere.
        assert!(!log.resolve(first, ChatReplyContent::Text("late".to_owned())));
        assert!(log.is_awaiting());

        assert!(log.resolve(second, ChatReplyContent::Text("fresh".to_owned())));
        assert!(!log.is_awaiting());
        let texts: Vec<&MessageContent> =
            log.messages().iter().map(|m| &m.content).collect();
        assert!(!texts.contains(&&MessageContent::Text("late".to_owned())));
        assert!(texts.contains(&&MessageContent::Text("fresh".to_owned())));
    }

    #[test]
    fn failure_settles_placeholder_with_error() {
        let mut log = ChatLog::default();
        let id = dispatch(&mut log, "stock levels?");
        assert!(log.fail(id, "chat request failed: connection refused"));
        assert!(matches!(
            log.messages()[1].content,
            MessageContent::Error(_)
        ));
    }

    #[test]
    fn report_generation_refuses_double_start() {
        let mut log = ChatLog::default();
        let id = dispatch(&mut log, "monthly report please");
        log.resolve(id, ChatReplyContent::ReportPrompt(sample_prompt()));
        let prompt_id = prompt_message_id(&log);

        assert!(log.begin_report(prompt_id));
        assert!(!log.begin_report(prompt_id));

        log.finish_report(prompt_id);
        assert!(log.begin_report(prompt_id));
    }

    #[test]
    fn report_failure_appends_error_and_keeps_prompt() {
        let mut log = ChatLog::default();
        let id = dispatch(&mut log, "monthly report please");
        log.resolve(id, ChatReplyContent::ReportPrompt(sample_prompt()));
        let prompt_id = prompt_message_id(&log);
        let before = log.messages().len();

        assert!(log.begin_report(prompt_id));
        log.fail_report(prompt_id, "report failed: 502 Bad Gateway");

        assert_eq!(log.messages().len(), before + 1);
        assert!(matches!(
            log.messages().last().map(|m| &m.content),
            Some(MessageContent::Error(_)),
        ));
        // Prompt is intact and ready for a retry.
        assert!(log.begin_report(prompt_id));
    }

    #[test]
    fn report_cursors_wrap_and_select() {
        let mut log = ChatLog::default();
        let id = dispatch(&mut log, "monthly report please");
        log.resolve(id, ChatReplyContent::ReportPrompt(sample_prompt()));
        let prompt_id = prompt_message_id(&log);

        assert_eq!(log.report_selection(prompt_id), Some(("sales", "2026-07")));

        log.cycle_report_option(prompt_id, 1);
        log.cycle_report_month(prompt_id, -1);
        assert_eq!(
            log.report_selection(prompt_id),
            Some(("inventory", "2026-08")),
        );

        log.cycle_report_option(prompt_id, 1);
        assert_eq!(
            log.report_selection(prompt_id),
            Some(("sales", "2026-08")),
        );
    }
}
