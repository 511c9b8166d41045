//! Chat conversation state: message history plus the one in-flight reply.

use crate::error::Result;
use crate::fixtures::find_ticket;
use crate::resolver::{ReplyCategory, GREETING_TEXT};
use crate::state::ChatMessage;

pub const WELCOME_ID: &str = "welcome";
pub const REPLY_FAILED_NOTICE: &str = "Failed to get AI response. Please try again.";

/// Shortcut buttons shown above the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Train,
    Bus,
    Flight,
    Event,
    Movie,
}

impl QuickAction {
    pub const ALL: [QuickAction; 5] = [
        QuickAction::Train,
        QuickAction::Bus,
        QuickAction::Flight,
        QuickAction::Event,
        QuickAction::Movie,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::Train => "Book Train",
            QuickAction::Bus => "Book Bus",
            QuickAction::Flight => "Book Flight",
            QuickAction::Event => "Event Tickets",
            QuickAction::Movie => "Movie Tickets",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            QuickAction::Train => "I want to book a train ticket",
            QuickAction::Bus => "I want to book a bus ticket",
            QuickAction::Flight => "I want to book a flight",
            QuickAction::Event => "I want to book event tickets",
            QuickAction::Movie => "I want to book movie tickets",
        }
    }
}

/// Ticket for a reply the caller has to produce and hand back via
/// [`ChatSession::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub prompt: String,
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Delivered,
    /// The reply failed; show the notice to the user
    Failed(&'static str),
    /// The session was reset after the request; the result was discarded
    Stale,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
    show_tickets: bool,
    epoch: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![welcome_message()],
            pending: false,
            show_tickets: false,
            epoch: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn show_tickets(&self) -> bool {
        self.show_tickets
    }

    /// Record a user message and request a reply. Returns `None` when the
    /// text is blank or a reply is still outstanding.
    pub fn submit(&mut self, text: &str) -> Option<PendingReply> {
        let text = text.trim();
        if text.is_empty() || self.pending {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        self.pending = true;

        if ReplyCategory::classify(text) == ReplyCategory::Route {
            self.show_tickets = true;
        }

        Some(PendingReply {
            prompt: text.to_string(),
            epoch: self.epoch,
        })
    }

    pub fn quick_action(&mut self, action: QuickAction) -> Option<PendingReply> {
        self.submit(action.prompt())
    }

    pub fn select_ticket(&mut self, id: &str) -> Option<PendingReply> {
        let ticket = find_ticket(id)?;
        let text = format!("I want to book the {} ({} departure)", ticket.provider, ticket.departure);
        self.submit(&text)
    }

    pub fn complete(&mut self, ticket: &PendingReply, result: Result<String>) -> ReplyOutcome {
        if ticket.epoch != self.epoch {
            tracing::warn!(epoch = ticket.epoch, current = self.epoch, "dropping reply for a reset session");
            return ReplyOutcome::Stale;
        }

        self.pending = false;
        match result {
            Ok(content) => {
                self.messages.push(ChatMessage::assistant(content));
                ReplyOutcome::Delivered
            }
            Err(e) => {
                tracing::warn!(error = %e, "reply failed");
                ReplyOutcome::Failed(REPLY_FAILED_NOTICE)
            }
        }
    }

    /// Start a fresh conversation. Any outstanding reply becomes stale.
    pub fn reset(&mut self) {
        self.messages = vec![welcome_message()];
        self.pending = false;
        self.show_tickets = false;
        self.epoch += 1;
    }
}

fn welcome_message() -> ChatMessage {
    let mut message = ChatMessage::assistant(GREETING_TEXT);
    message.id = WELCOME_ID.to_string();
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;
    use crate::resolver::compose_reply;

    #[test]
    fn test_starts_with_welcome() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].id, WELCOME_ID);
        assert_eq!(session.messages()[0].content, GREETING_TEXT);
    }

    #[test]
    fn test_second_submit_refused_while_pending() {
        let mut session = ChatSession::new();
        let ticket = session.submit("train please").unwrap();
        assert!(session.is_pending());
        assert!(session.submit("bus please").is_none());

        assert_eq!(session.complete(&ticket, Ok("reply".into())), ReplyOutcome::Delivered);
        assert!(!session.is_pending());
        assert!(session.submit("bus please").is_some());
    }

    #[test]
    fn test_blank_submit_ignored() {
        let mut session = ChatSession::new();
        assert!(session.submit("   ").is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_messages_keep_insertion_order() {
        let mut session = ChatSession::new();
        let ticket = session.submit("first").unwrap();
        session.complete(&ticket, Ok("answer".into()));
        let ticket = session.submit("second").unwrap();
        session.complete(&ticket, Ok("answer two".into()));

        let contents: Vec<&str> = session.messages()[1..].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "answer", "second", "answer two"]);
    }

    #[test]
    fn test_route_reveals_tickets() {
        let mut session = ChatSession::new();
        session.submit("Chennai to Bangalore tomorrow").unwrap();
        assert!(session.show_tickets());
    }

    #[test]
    fn test_tickets_follow_route_replies() {
        for prompt in [
            "bus from Chennai",
            "BANGALORE flights",
            "cheapest train chennai-bangalore",
            "hello",
        ] {
            let mut session = ChatSession::new();
            let pending = session.submit(prompt).unwrap();
            let reply = compose_reply(&pending.prompt, None);
            assert_eq!(session.complete(&pending, Ok(reply.clone())), ReplyOutcome::Delivered);

            let itinerary = ReplyCategory::classify(prompt) == ReplyCategory::Route;
            assert_eq!(session.show_tickets(), itinerary, "{prompt}");
            assert_eq!(reply.contains("Best Options Available"), itinerary, "{prompt}");
        }
    }

    #[test]
    fn test_stale_reply_dropped_after_reset() {
        let mut session = ChatSession::new();
        let ticket = session.submit("train").unwrap();
        session.reset();

        assert_eq!(session.complete(&ticket, Ok("late".into())), ReplyOutcome::Stale);
        assert_eq!(session.messages().len(), 1);
        assert!(!session.is_pending());
        assert!(!session.show_tickets());
    }

    #[test]
    fn test_failure_yields_notice_without_message() {
        let mut session = ChatSession::new();
        let ticket = session.submit("train").unwrap();
        let outcome = session.complete(&ticket, Err(AgentError::Cancelled));
        assert_eq!(outcome, ReplyOutcome::Failed(REPLY_FAILED_NOTICE));
        assert_eq!(session.messages().len(), 2);
        assert!(!session.is_pending());
    }

    #[test]
    fn test_quick_action_and_ticket_selection() {
        let mut session = ChatSession::new();
        let ticket = session.quick_action(QuickAction::Movie).unwrap();
        assert_eq!(ticket.prompt, "I want to book movie tickets");
        session.complete(&ticket, Ok("ok".into()));

        let ticket = session.select_ticket("2").unwrap();
        assert_eq!(ticket.prompt, "I want to book the Brindavan Express (07:30 departure)");
        session.complete(&ticket, Ok("ok".into()));

        assert!(session.select_ticket("99").is_none());
    }
}
