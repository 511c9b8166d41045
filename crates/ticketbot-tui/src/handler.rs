use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use ticketbot_core::DraftField;

use crate::app::{App, ChatFocus, InputMode, PlaygroundFocus, Screen, TextInput};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick(),
    }
    app.poll_replies().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Screen switching and quit are shared by every screen
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char(c @ '1'..='3') => {
            let idx = c as usize - '1' as usize;
            app.screen = Screen::ALL[idx];
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Chat => handle_chat_normal(app, key),
        Screen::Booking => handle_booking_normal(app, key),
        Screen::Playground => handle_playground_normal(app, key),
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.cycle_chat_focus(),
        KeyCode::Char('r') => app.reset_chat(),

        // Chat history scroll
        KeyCode::PageDown => app.chat_scroll = app.chat_scroll.saturating_add(app.chat_height / 2),
        KeyCode::PageUp => app.chat_scroll = app.chat_scroll.saturating_sub(app.chat_height / 2),

        _ => match app.chat_focus {
            ChatFocus::Input => match key.code {
                KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
                KeyCode::Char('j') | KeyCode::Down => app.chat_scroll = app.chat_scroll.saturating_add(1),
                KeyCode::Char('k') | KeyCode::Up => app.chat_scroll = app.chat_scroll.saturating_sub(1),
                KeyCode::Char('G') => app.scroll_chat_to_bottom(),
                KeyCode::Char('g') => app.chat_scroll = 0,
                _ => {}
            },
            ChatFocus::Actions => match key.code {
                KeyCode::Char('l') | KeyCode::Right => app.action_next(),
                KeyCode::Char('h') | KeyCode::Left => app.action_prev(),
                KeyCode::Enter => app.trigger_quick_action(),
                _ => {}
            },
            ChatFocus::Tickets => match key.code {
                KeyCode::Char('j') | KeyCode::Down => app.ticket_nav_down(),
                KeyCode::Char('k') | KeyCode::Up => app.ticket_nav_up(),
                KeyCode::Enter => app.select_ticket(),
                _ => {}
            },
        },
    }
}

fn handle_booking_normal(app: &mut App, key: KeyEvent) {
    if app.wizard.is_complete() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char('n')) {
            app.wizard_continue();
        }
        return;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.field_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.field_nav_up(),
        KeyCode::Char('i') | KeyCode::Enter => {
            if app.wizard.step().fields().is_empty() {
                // Review step has nothing to edit; Enter confirms
                if key.code == KeyCode::Enter {
                    app.wizard_continue();
                }
            } else {
                app.begin_field_edit();
            }
        }
        KeyCode::Char('n') | KeyCode::Right => app.wizard_continue(),
        KeyCode::Char('b') | KeyCode::Left | KeyCode::Backspace => app.wizard_back(),
        // Passenger count shortcuts
        KeyCode::Char('+') => {
            let count = app.wizard.draft().passengers.saturating_add(1);
            app.wizard.update_field(DraftField::Passengers, &count.to_string());
        }
        KeyCode::Char('-') => {
            let count = app.wizard.draft().passengers.saturating_sub(1);
            app.wizard.update_field(DraftField::Passengers, &count.to_string());
        }
        _ => {}
    }
}

fn handle_playground_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.cycle_playground_focus(),
        KeyCode::Char('r') => app.run_playground(),
        KeyCode::Char('v') => app.playground.verbose = !app.playground.verbose,
        KeyCode::Char('x') => app.reset_playground(),
        KeyCode::Char('c') => app.copy_response(),
        KeyCode::PageDown => app.response_scroll = app.response_scroll.saturating_add(5),
        KeyCode::PageUp => app.response_scroll = app.response_scroll.saturating_sub(5),
        _ => match app.playground_focus {
            PlaygroundFocus::Prompt | PlaygroundFocus::Instructions => {
                if matches!(key.code, KeyCode::Char('i') | KeyCode::Enter) {
                    app.begin_playground_edit();
                }
            }
            PlaygroundFocus::Examples => match key.code {
                KeyCode::Char('j') | KeyCode::Down => app.example_nav_down(),
                KeyCode::Char('k') | KeyCode::Up => app.example_nav_up(),
                KeyCode::Enter => app.load_selected_example(),
                _ => {}
            },
        },
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match app.screen {
        Screen::Chat => match key.code {
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            // Input stays editable while a reply is pending; sending waits for it
            KeyCode::Enter => app.send_chat_input(),
            _ => edit_text(&mut app.chat_input, key),
        },
        Screen::Booking => match key.code {
            KeyCode::Esc => {
                app.field_input = TextInput::default();
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Enter | KeyCode::Tab => app.commit_field_edit(),
            _ => edit_text(&mut app.field_input, key),
        },
        Screen::Playground => match key.code {
            KeyCode::Esc => {
                app.playground_input = TextInput::default();
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.commit_playground_edit()
            }
            // Instructions are multi-line
            KeyCode::Enter if app.playground_focus == PlaygroundFocus::Instructions => {
                app.playground_input.insert('\n')
            }
            KeyCode::Enter => app.commit_playground_edit(),
            _ => edit_text(&mut app.playground_input, key),
        },
    }
}

fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) => input.insert(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (x, y) = (mouse.column, mouse.row);
    let in_chat = app.chat_area.is_some_and(|r| point_in_rect(x, y, r));
    let in_response = app.response_area.is_some_and(|r| point_in_rect(x, y, r));

    match (mouse.kind, app.screen) {
        (MouseEventKind::ScrollDown, Screen::Chat) if in_chat => {
            app.chat_scroll = app.chat_scroll.saturating_add(3);
        }
        (MouseEventKind::ScrollUp, Screen::Chat) if in_chat => {
            app.chat_scroll = app.chat_scroll.saturating_sub(3);
        }
        (MouseEventKind::ScrollDown, Screen::Playground) if in_response => {
            app.response_scroll = app.response_scroll.saturating_add(3);
        }
        (MouseEventKind::ScrollUp, Screen::Playground) if in_response => {
            app.response_scroll = app.response_scroll.saturating_sub(3);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::NoticeKind;
    use crate::clipboard::Clipboard;
    use ticketbot_core::{Config, WizardStep};

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(text: &str) -> Vec<AppEvent> {
        text.chars().map(|c| press(KeyCode::Char(c))).collect()
    }

    #[tokio::test]
    async fn test_screen_switch_and_quit() {
        let mut app = App::new(&Config::default());
        handle_event(&mut app, press(KeyCode::Char('2'))).await.unwrap();
        assert_eq!(app.screen, Screen::Booking);
        handle_event(&mut app, press(KeyCode::Char('3'))).await.unwrap();
        assert_eq!(app.screen, Screen::Playground);

        let ctrl_c = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        handle_event(&mut app, ctrl_c).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_typing_in_chat_sends_message() {
        let mut app = App::new(&Config::default());
        handle_event(&mut app, press(KeyCode::Char('i'))).await.unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);

        // 'q' while editing is text, not quit
        for event in type_text("quick bus") {
            handle_event(&mut app, event).await.unwrap();
        }
        assert!(!app.should_quit);
        assert_eq!(app.chat_input.value, "quick bus");

        handle_event(&mut app, press(KeyCode::Enter)).await.unwrap();
        assert!(app.chat.is_pending());
        assert_eq!(app.chat.messages().len(), 2);
        assert!(app.chat_input.value.is_empty());
    }

    #[tokio::test]
    async fn test_instructions_edit_keeps_newlines() {
        let mut app = App::new(&Config::default());
        app.screen = Screen::Playground;
        handle_event(&mut app, press(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.playground_focus, PlaygroundFocus::Instructions);

        handle_event(&mut app, press(KeyCode::Char('i'))).await.unwrap();
        handle_event(&mut app, press(KeyCode::End)).await.unwrap();
        handle_event(&mut app, press(KeyCode::Enter)).await.unwrap();
        for event in type_text("Be brief") {
            handle_event(&mut app, event).await.unwrap();
        }
        assert_eq!(app.input_mode, InputMode::Editing);

        let ctrl_s = AppEvent::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        handle_event(&mut app, ctrl_s).await.unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.playground.instructions.ends_with("responses.\nBe brief"));
        assert!(app.playground.instructions.starts_with("You are an intelligent"));
    }

    fn app_with_response() -> App {
        let mut app = App::new(&Config::default());
        app.screen = Screen::Playground;
        app.playground.prompt = "train".to_string();
        app.playground.prepare().unwrap();
        app.playground.finish(Ok("Shatabdi Express ₹985".to_string()));
        app
    }

    #[tokio::test]
    async fn test_copy_without_clipboard_tool_reports_error() {
        let mut app = app_with_response();
        app.clipboard = Clipboard::new("ticketbot-no-such-clipboard-tool", &[]);

        handle_event(&mut app, press(KeyCode::Char('c'))).await.unwrap();
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Failed to copy response.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_reports_success() {
        let mut app = app_with_response();
        app.clipboard = Clipboard::new("cat", &[]);

        handle_event(&mut app, press(KeyCode::Char('c'))).await.unwrap();
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_eq!(notice.title, "Copied");
    }

    #[tokio::test]
    async fn test_copy_without_response_does_nothing() {
        let mut app = App::new(&Config::default());
        app.screen = Screen::Playground;
        app.clipboard = Clipboard::new("ticketbot-no-such-clipboard-tool", &[]);

        handle_event(&mut app, press(KeyCode::Char('c'))).await.unwrap();
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_booking_keys_walk_the_wizard() {
        let mut app = App::new(&Config::default());
        app.screen = Screen::Booking;

        handle_event(&mut app, press(KeyCode::Char('+'))).await.unwrap();
        assert_eq!(app.wizard.draft().passengers, 2);

        handle_event(&mut app, press(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.wizard.step(), WizardStep::PassengerInfo);
        handle_event(&mut app, press(KeyCode::Char('b'))).await.unwrap();
        assert_eq!(app.wizard.step(), WizardStep::JourneyDetails);
        handle_event(&mut app, press(KeyCode::Char('b'))).await.unwrap();
        assert_eq!(app.wizard.step(), WizardStep::JourneyDetails);

        handle_event(&mut app, press(KeyCode::Char('n'))).await.unwrap();
        handle_event(&mut app, press(KeyCode::Char('n'))).await.unwrap();
        handle_event(&mut app, press(KeyCode::Enter)).await.unwrap();
        assert!(app.wizard.is_complete());

        handle_event(&mut app, press(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.wizard.step(), WizardStep::JourneyDetails);
        assert_eq!(app.wizard.draft().passengers, 1);
    }
}
