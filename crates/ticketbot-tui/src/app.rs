use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use crate::clipboard::Clipboard;
use ticketbot_core::{
    Advance, BookingWizard, ChatSession, Config, DraftField, MockAssistant, PendingReply, Playground,
    QuickAction, ReplyOutcome, ReplyTask, TICKET_OPTIONS, EXAMPLE_PROMPTS,
};

/// How many ticks a notice stays on screen (about three seconds)
const NOTICE_TICKS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Booking,
    Playground,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Chat, Screen::Booking, Screen::Playground];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Chat => "Chat",
            Screen::Booking => "Booking",
            Screen::Playground => "Playground",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFocus {
    Input,
    Actions,
    Tickets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaygroundFocus {
    Prompt,
    Instructions,
    Examples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient status-line message
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub text: String,
    pub kind: NoticeKind,
    ticks_left: u8,
}

/// Single-line text input with a character-indexed cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl TextInput {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Cursor row and column, with `\n` starting a new row
    pub fn cursor_row_col(&self) -> (usize, usize) {
        self.value
            .chars()
            .take(self.cursor)
            .fold((0, 0), |(row, col), c| if c == '\n' { (row + 1, 0) } else { (row, col + 1) })
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub notice: Option<Notice>,
    pub animation_frame: u8, // 0-2 for ellipsis animation
    pub assistant: MockAssistant,

    // Chat state
    pub chat: ChatSession,
    pub chat_input: TextInput,
    pub chat_focus: ChatFocus,
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations
    pub action_idx: usize,
    pub ticket_state: ListState,
    pub reply_task: Option<(PendingReply, ReplyTask)>,

    // Booking state
    pub wizard: BookingWizard,
    pub field_state: ListState,
    pub field_input: TextInput,

    // Playground state
    pub playground: Playground,
    pub playground_focus: PlaygroundFocus,
    pub playground_input: TextInput,
    pub example_state: ListState,
    pub response_scroll: u16,
    pub playground_task: Option<ReplyTask>,
    pub clipboard: Clipboard,

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub response_area: Option<Rect>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut playground = Playground::new(&config.system_instructions);
        playground.verbose = config.verbose;

        let mut field_state = ListState::default();
        field_state.select(Some(0));

        let mut example_state = ListState::default();
        example_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Chat,
            input_mode: InputMode::Normal,
            notice: None,
            animation_frame: 0,
            assistant: MockAssistant::new(config.latency()),

            chat: ChatSession::new(),
            chat_input: TextInput::default(),
            chat_focus: ChatFocus::Input,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            action_idx: 0,
            ticket_state: ListState::default(),
            reply_task: None,

            wizard: BookingWizard::default(),
            field_state,
            field_input: TextInput::default(),

            playground,
            playground_focus: PlaygroundFocus::Prompt,
            playground_input: TextInput::default(),
            example_state,
            response_scroll: 0,
            playground_task: None,
            clipboard: Clipboard::default(),

            chat_area: None,
            response_area: None,
        }
    }

    // Notices
    pub fn notify(&mut self, title: &str, text: &str) {
        self.set_notice(title, text, NoticeKind::Info);
    }

    pub fn notify_error(&mut self, title: &str, text: &str) {
        self.set_notice(title, text, NoticeKind::Error);
    }

    fn set_notice(&mut self, title: &str, text: &str, kind: NoticeKind) {
        self.notice = Some(Notice {
            title: title.to_string(),
            text: text.to_string(),
            kind,
            ticks_left: NOTICE_TICKS,
        });
    }

    /// Advance animations and expire notices (called by Tick event)
    pub fn tick(&mut self) {
        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }

        if let Some(notice) = &mut self.notice {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
            }
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.chat.is_pending() || self.playground.is_running()
    }

    // Chat actions
    pub fn send_chat_input(&mut self) {
        if self.chat.is_pending() {
            return;
        }
        let text = self.chat_input.take();
        let pending = self.chat.submit(&text);
        self.dispatch_reply(pending);
    }

    pub fn trigger_quick_action(&mut self) {
        if let Some(&action) = QuickAction::ALL.get(self.action_idx) {
            let pending = self.chat.quick_action(action);
            self.dispatch_reply(pending);
        }
    }

    pub fn select_ticket(&mut self) {
        let ticket = self.ticket_state.selected().and_then(|i| TICKET_OPTIONS.get(i));
        if let Some(ticket) = ticket {
            let pending = self.chat.select_ticket(ticket.id);
            self.dispatch_reply(pending);
        }
    }

    fn dispatch_reply(&mut self, pending: Option<PendingReply>) {
        let Some(pending) = pending else {
            return;
        };

        tracing::debug!(prompt = %pending.prompt, "requesting reply");
        let task = self.assistant.spawn_reply(pending.prompt.clone(), None);
        self.reply_task = Some((pending, task));

        if self.chat.show_tickets() && self.ticket_state.selected().is_none() {
            self.ticket_state.select(Some(0));
        }

        // Scroll to bottom so the typing indicator is visible
        self.scroll_chat_to_bottom();
    }

    pub fn reset_chat(&mut self) {
        // Dropping the task aborts it
        self.reply_task = None;
        self.chat.reset();
        self.chat_input = TextInput::default();
        self.chat_focus = ChatFocus::Input;
        self.chat_scroll = 0;
        self.ticket_state.select(None);
        self.notify("Chat Reset", "Started a new conversation.");
    }

    pub fn action_next(&mut self) {
        self.action_idx = (self.action_idx + 1).min(QuickAction::ALL.len() - 1);
    }

    pub fn action_prev(&mut self) {
        self.action_idx = self.action_idx.saturating_sub(1);
    }

    pub fn ticket_nav_down(&mut self) {
        let i = self.ticket_state.selected().unwrap_or(0);
        self.ticket_state.select(Some((i + 1).min(TICKET_OPTIONS.len() - 1)));
    }

    pub fn ticket_nav_up(&mut self) {
        let i = self.ticket_state.selected().unwrap_or(0);
        self.ticket_state.select(Some(i.saturating_sub(1)));
    }

    /// Cycle focus: Input -> Actions -> Tickets (when shown) -> Input
    pub fn cycle_chat_focus(&mut self) {
        self.chat_focus = match self.chat_focus {
            ChatFocus::Input => ChatFocus::Actions,
            ChatFocus::Actions if self.chat.show_tickets() => ChatFocus::Tickets,
            ChatFocus::Actions | ChatFocus::Tickets => ChatFocus::Input,
        };
    }

    /// Scroll chat to bottom so the newest message is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 { self.chat_width as usize } else { 50 };

        let mut total_lines: u16 = 0;
        for msg in self.chat.messages() {
            total_lines = total_lines.saturating_add(1); // Role line ("You:" or "Assistant:")
            for line in msg.content.lines() {
                let wrapped = line.chars().count() / wrap_width + 1;
                total_lines = total_lines.saturating_add(u16::try_from(wrapped).unwrap_or(u16::MAX));
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }
        if self.chat.is_pending() {
            total_lines = total_lines.saturating_add(2);
        }

        let visible_height = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    // Booking actions
    pub fn selected_field(&self) -> Option<DraftField> {
        let fields = self.wizard.step().fields();
        self.field_state.selected().and_then(|i| fields.get(i).copied())
    }

    pub fn field_nav_down(&mut self) {
        let len = self.wizard.step().fields().len();
        if len > 0 {
            let i = self.field_state.selected().unwrap_or(0);
            self.field_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn field_nav_up(&mut self) {
        let i = self.field_state.selected().unwrap_or(0);
        self.field_state.select(Some(i.saturating_sub(1)));
    }

    pub fn begin_field_edit(&mut self) {
        if let Some(field) = self.selected_field() {
            self.field_input = TextInput::with_value(&self.wizard.draft().value(field));
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn commit_field_edit(&mut self) {
        if let Some(field) = self.selected_field() {
            let value = self.field_input.take();
            self.wizard.update_field(field, &value);
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn wizard_continue(&mut self) {
        if self.wizard.is_complete() {
            self.wizard.restart();
        } else if let Advance::Completed(_) = self.wizard.advance() {
            self.notify("Booking Simulated!", "This is a demo - no real booking was made.");
        }
        self.field_state.select(Some(0));
    }

    pub fn wizard_back(&mut self) {
        self.wizard.retreat();
        self.field_state.select(Some(0));
    }

    // Playground actions
    pub fn begin_playground_edit(&mut self) {
        let value = match self.playground_focus {
            PlaygroundFocus::Prompt => &self.playground.prompt,
            PlaygroundFocus::Instructions => &self.playground.instructions,
            PlaygroundFocus::Examples => return,
        };
        self.playground_input = TextInput::with_value(value);
        self.input_mode = InputMode::Editing;
    }

    pub fn commit_playground_edit(&mut self) {
        let value = self.playground_input.take();
        match self.playground_focus {
            PlaygroundFocus::Prompt => self.playground.prompt = value,
            PlaygroundFocus::Instructions => self.playground.instructions = value,
            PlaygroundFocus::Examples => {}
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn cycle_playground_focus(&mut self) {
        self.playground_focus = match self.playground_focus {
            PlaygroundFocus::Prompt => PlaygroundFocus::Instructions,
            PlaygroundFocus::Instructions => PlaygroundFocus::Examples,
            PlaygroundFocus::Examples => PlaygroundFocus::Prompt,
        };
    }

    pub fn example_nav_down(&mut self) {
        let i = self.example_state.selected().unwrap_or(0);
        self.example_state.select(Some((i + 1).min(EXAMPLE_PROMPTS.len() - 1)));
    }

    pub fn example_nav_up(&mut self) {
        let i = self.example_state.selected().unwrap_or(0);
        self.example_state.select(Some(i.saturating_sub(1)));
    }

    pub fn load_selected_example(&mut self) {
        if let Some(i) = self.example_state.selected() {
            self.playground.load_example(i);
            self.playground_focus = PlaygroundFocus::Prompt;
        }
    }

    pub fn run_playground(&mut self) {
        match self.playground.prepare() {
            Ok(request) => {
                self.response_scroll = 0;
                let task = self.assistant.spawn_reply(request.prompt, Some(request.instructions));
                self.playground_task = Some(task);
            }
            Err(ticketbot_core::AgentError::EmptyPrompt) => {
                self.notify_error("Empty Prompt", "Please enter a prompt to test.");
            }
            Err(e) => {
                tracing::debug!(error = %e, "playground run refused");
            }
        }
    }

    pub fn copy_response(&mut self) {
        let Some(response) = self.playground.response() else {
            return;
        };
        let result = self.clipboard.copy(response);
        match result {
            Ok(()) => self.notify("Copied", "Response copied to clipboard."),
            Err(e) => {
                tracing::warn!(error = %e, "copy to clipboard failed");
                self.notify_error("Error", "Failed to copy response.");
            }
        }
    }

    pub fn reset_playground(&mut self) {
        self.playground_task = None;
        self.playground.reset();
        self.response_scroll = 0;
        self.notify("Reset Complete", "Playground has been reset to defaults.");
    }

    /// Collect finished background replies and apply them to their screens
    pub async fn poll_replies(&mut self) {
        if self.reply_task.as_ref().is_some_and(|(_, task)| task.is_finished()) {
            if let Some((pending, task)) = self.reply_task.take() {
                let result = task.join().await;
                match self.chat.complete(&pending, result) {
                    ReplyOutcome::Delivered => self.scroll_chat_to_bottom(),
                    ReplyOutcome::Failed(notice) => self.notify_error("Error", notice),
                    ReplyOutcome::Stale => {}
                }
            }
        }

        if self.playground_task.as_ref().is_some_and(|task| task.is_finished()) {
            if let Some(task) = self.playground_task.take() {
                let result = task.join().await;
                if let Some(notice) = self.playground.finish(result) {
                    self.notify_error("Error", notice);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketbot_core::{ChatRole, WizardStep};

    fn instant_app() -> App {
        let config = Config {
            min_delay_ms: 0,
            jitter_ms: 0,
            ..Config::default()
        };
        App::new(&config)
    }

    async fn settle(app: &mut App) {
        for _ in 0..100 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            app.poll_replies().await;
            if !app.is_waiting() {
                return;
            }
        }
    }

    #[test]
    fn test_text_input_utf8_editing() {
        let mut input = TextInput::with_value("₹98");
        input.home();
        input.right();
        input.insert('5');
        assert_eq!(input.value, "₹598");
        input.backspace();
        input.delete();
        assert_eq!(input.value, "₹8");
        input.end();
        assert_eq!(input.cursor, 2);
        assert_eq!(input.take(), "₹8");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_cursor_row_col_counts_newlines() {
        let mut input = TextInput::with_value("Be kind\n\nBe brief");
        assert_eq!(input.cursor_row_col(), (2, 8));
        input.home();
        assert_eq!(input.cursor_row_col(), (0, 0));
        for _ in 0..8 {
            input.right();
        }
        assert_eq!(input.cursor_row_col(), (1, 0));
    }

    #[tokio::test]
    async fn test_chat_roundtrip_through_task() {
        let mut app = instant_app();
        app.chat_input = TextInput::with_value("Chennai to Bangalore please");
        app.send_chat_input();
        assert!(app.chat.is_pending());
        assert_eq!(app.ticket_state.selected(), Some(0));

        settle(&mut app).await;
        let messages = app.chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert!(messages[2].content.contains("Shatabdi Express"));
    }

    #[tokio::test]
    async fn test_reset_abandons_pending_reply() {
        let mut app = instant_app();
        app.chat_input = TextInput::with_value("train");
        app.send_chat_input();
        app.reset_chat();

        assert!(app.reply_task.is_none());
        settle(&mut app).await;
        assert_eq!(app.chat.messages().len(), 1);
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_scroll_to_bottom_with_huge_history() {
        let mut app = instant_app();
        app.chat_width = 10;
        app.chat_height = 20;

        let pending = app.chat.submit("train").unwrap();
        let reply = format!("{}\n{}", "x".repeat(1_000_000), "line\n".repeat(70_000));
        app.chat.complete(&pending, Ok(reply));

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX - 20);
    }

    #[test]
    fn test_wizard_flow_through_app() {
        let mut app = App::new(&Config::default());
        app.field_state.select(Some(3));
        app.begin_field_edit();
        app.field_input = TextInput::with_value("2");
        app.commit_field_edit();

        app.wizard_continue();
        app.wizard_continue();
        app.wizard_continue();
        assert_eq!(app.wizard.step(), WizardStep::Complete);
        assert_eq!(app.wizard.summary().map(|s| s.total), Some(1970));
        assert!(app.notice.is_some());

        app.wizard_continue();
        assert_eq!(app.wizard.step(), WizardStep::JourneyDetails);
    }

    #[tokio::test]
    async fn test_playground_empty_prompt_notice() {
        let mut app = instant_app();
        app.run_playground();
        assert!(app.playground_task.is_none());
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[tokio::test]
    async fn test_playground_run_stores_response() {
        let mut app = instant_app();
        app.example_state.select(Some(1));
        app.load_selected_example();
        app.playground.verbose = true;
        app.run_playground();

        settle(&mut app).await;
        let response = app.playground.response().unwrap_or_default();
        assert!(response.contains("Verbose mode enabled"));
    }
}
