use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use ticketbot_core::{
    BookingSummary, ChatRole, QuickAction, TicketTag, WizardStep, EXAMPLE_PROMPTS,
    TICKET_OPTIONS,
};

use crate::app::{App, ChatFocus, InputMode, NoticeKind, PlaygroundFocus, Screen, TextInput};

/// Convert `**bold**` and `*italic*` markdown in one line to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '*' {
            current.push(c);
            continue;
        }

        let bold = chars.peek() == Some(&'*');
        if bold {
            chars.next();
        }

        // Collect up to the matching closing marker
        let mut inner = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            if c == '*' && (!bold || chars.peek() == Some(&'*')) {
                if bold {
                    chars.next();
                }
                closed = true;
                break;
            }
            inner.push(c);
        }

        let marker = if bold { "**" } else { "*" };
        if closed && !inner.is_empty() {
            if !current.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current)));
            }
            let modifier = if bold { Modifier::BOLD } else { Modifier::ITALIC };
            spans.push(Span::styled(inner, Style::default().add_modifier(modifier)));
        } else {
            // No closing marker, treat as literal
            current.push_str(marker);
            current.push_str(&inner);
            if closed {
                current.push_str(marker);
            }
        }
    }

    if !current.is_empty() {
        spans.push(Span::raw(current));
    }
    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Chat => render_chat_screen(app, frame, body_area),
        Screen::Booking => render_booking_screen(app, frame, body_area),
        Screen::Playground => render_playground_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    if app.notice.is_some() {
        render_notice(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        " AI Booking Agent ",
        Style::default().fg(Color::Cyan).bold(),
    )];

    for (i, screen) in Screen::ALL.iter().enumerate() {
        let style = if *screen == app.screen {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", i + 1, screen.title()), style));
    }

    spans.push(Span::styled("  Simulation Mode ", Style::default().fg(Color::Yellow)));
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(format!(" {key} "), key_style),
            Span::styled(format!(" {label} "), label_style),
        ]
    };

    let mut hints: Vec<Span> = Vec::new();
    match (app.screen, app.input_mode) {
        (Screen::Chat, InputMode::Editing) => {
            hints.extend(hint("Enter", "send"));
            hints.extend(hint("Esc", "stop typing"));
        }
        (Screen::Playground, InputMode::Editing) if app.playground_focus == PlaygroundFocus::Instructions => {
            hints.extend(hint("Enter", "new line"));
            hints.extend(hint("Ctrl-S", "save"));
            hints.extend(hint("Esc", "cancel"));
        }
        (Screen::Booking, InputMode::Editing) | (Screen::Playground, InputMode::Editing) => {
            hints.extend(hint("Enter", "save"));
            hints.extend(hint("Esc", "cancel"));
        }
        (Screen::Chat, InputMode::Normal) => {
            match app.chat_focus {
                ChatFocus::Input => {
                    hints.extend(hint("i", "type"));
                    hints.extend(hint("j/k", "scroll"));
                }
                ChatFocus::Actions => {
                    hints.extend(hint("h/l", "action"));
                    hints.extend(hint("Enter", "send"));
                }
                ChatFocus::Tickets => {
                    hints.extend(hint("j/k", "ticket"));
                    hints.extend(hint("Enter", "book"));
                }
            }
            hints.extend(hint("Tab", "focus"));
            hints.extend(hint("r", "reset"));
        }
        (Screen::Booking, InputMode::Normal) => {
            if app.wizard.is_complete() {
                hints.extend(hint("Enter", "new booking"));
            } else {
                if !app.wizard.step().fields().is_empty() {
                    hints.extend(hint("j/k", "field"));
                    hints.extend(hint("i", "edit"));
                }
                hints.extend(hint("n", "continue"));
                hints.extend(hint("b", "back"));
                hints.extend(hint("+/-", "passengers"));
            }
        }
        (Screen::Playground, InputMode::Normal) => {
            hints.extend(hint("Tab", "focus"));
            if app.playground_focus == PlaygroundFocus::Examples {
                hints.extend(hint("Enter", "load"));
            } else {
                hints.extend(hint("i", "edit"));
            }
            hints.extend(hint("r", "run"));
            hints.extend(hint("v", "verbose"));
            hints.extend(hint("c", "copy"));
            hints.extend(hint("x", "reset"));
        }
    }
    if app.input_mode == InputMode::Normal {
        hints.extend(hint("1-3", "screen"));
        hints.extend(hint("q", "quit"));
    }

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn border_color(focused: bool) -> Color {
    if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}

/// Render a single-line input box with horizontal scrolling and an optional cursor
fn render_text_input(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    input: &TextInput,
    placeholder: &str,
    show_cursor: bool,
) {
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width > 0 && input.cursor >= inner_width {
        input.cursor - inner_width + 1
    } else {
        0
    };

    let paragraph = if input.value.is_empty() && !show_cursor {
        Paragraph::new(Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)))
    } else {
        let visible: String = input.value.chars().skip(scroll_offset).take(inner_width).collect();
        Paragraph::new(visible).style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(paragraph.block(block), area);

    if show_cursor {
        let cursor_x = (input.cursor - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

/// Render an unwrapped multi-line editor, scrolled so the cursor stays inside the box
fn render_multiline_input(frame: &mut Frame, area: Rect, block: Block, input: &TextInput) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let (row, col) = input.cursor_row_col();

    let row_offset = row.saturating_sub(inner_height.saturating_sub(1));
    let col_offset = col.saturating_sub(inner_width.saturating_sub(1));

    let editor = Paragraph::new(input.value.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(block)
        .scroll((
            u16::try_from(row_offset).unwrap_or(u16::MAX),
            u16::try_from(col_offset).unwrap_or(u16::MAX),
        ));
    frame.render_widget(editor, area);

    let cursor_x = u16::try_from(col - col_offset).unwrap_or(0);
    let cursor_y = u16::try_from(row - row_offset).unwrap_or(0);
    frame.set_cursor_position((area.x + 1 + cursor_x, area.y + 1 + cursor_y));
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let tickets_height = if app.chat.show_tickets() {
        TICKET_OPTIONS.len() as u16 + 2
    } else {
        0
    };

    let [actions_area, chat_area, tickets_area, input_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(tickets_height),
        Constraint::Length(3),
    ])
    .areas(area);

    render_quick_actions(app, frame, actions_area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_area = Some(chat_area);
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ")
        .title_bottom(Line::from(" Online ").fg(Color::Green));

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.chat.messages() {
        let time = msg.timestamp.with_timezone(&Local).format("%H:%M");
        let (label, color) = match msg.role {
            ChatRole::User => ("You", Color::Cyan),
            ChatRole::Assistant => ("Assistant", Color::Yellow),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label}:"), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {time}"), Style::default().fg(Color::DarkGray)),
        ]));
        for line in msg.content.lines() {
            lines.push(parse_markdown_line(line));
        }
        lines.push(Line::default());
    }

    if app.chat.is_pending() {
        lines.push(Line::from(Span::styled(
            "Assistant:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("Typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    if tickets_height > 0 {
        render_ticket_cards(app, frame, tickets_area);
    }

    let editing = app.input_mode == InputMode::Editing;
    let input_focused = app.chat_focus == ChatFocus::Input;
    let input_color = if editing {
        Color::Yellow
    } else {
        border_color(input_focused)
    };
    let title = if app.chat.is_pending() {
        " Message (waiting for reply) "
    } else {
        " Message (i to type, Enter to send) "
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_color))
        .title(title);

    render_text_input(
        frame,
        input_area,
        input_block,
        &app.chat_input,
        "Type your booking request... (e.g., 'Book a train from Chennai to Bangalore')",
        editing,
    );
}

fn render_quick_actions(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.chat_focus == ChatFocus::Actions;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(focused)))
        .title(" Quick Actions ");

    let mut spans = Vec::new();
    for (i, action) in QuickAction::ALL.iter().enumerate() {
        let style = if focused && i == app.action_idx {
            Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", action.label()), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_ticket_cards(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.chat_focus == ChatFocus::Tickets;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::Magenta }))
        .title(" Available Options (Tab to focus, Enter to book) ");

    let items: Vec<ListItem> = TICKET_OPTIONS
        .iter()
        .map(|ticket| {
            let mut spans = vec![
                Span::styled(format!("{:<18}", ticket.provider), Style::default().bold()),
                Span::raw(format!(
                    " {} {} → {} {}  {}  ",
                    ticket.origin, ticket.departure, ticket.destination, ticket.arrival, ticket.duration
                )),
                Span::styled(format!("₹{}", ticket.price), Style::default().fg(Color::Green).bold()),
                Span::raw(format!("  ★ {:.1} ", ticket.rating)),
            ];
            for tag in ticket.tags {
                let color = match tag {
                    TicketTag::Cheapest => Color::Green,
                    TicketTag::Fastest => Color::Yellow,
                    TicketTag::Recommended => Color::Cyan,
                };
                spans.push(Span::styled(format!("[{}] ", tag.label()), Style::default().fg(color)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Magenta)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.ticket_state);
}

fn render_booking_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    if let Some(summary) = app.wizard.summary().cloned() {
        render_booking_complete(frame, area, &summary);
        return;
    }

    let [progress_area, main_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    render_progress(app, frame, progress_area);

    let [form_area, summary_area] = Layout::horizontal([
        Constraint::Percentage(65),
        Constraint::Percentage(35),
    ])
    .areas(main_area);

    render_booking_form(app, frame, form_area);
    render_booking_sidebar(app, frame, summary_area);
}

fn render_progress(app: &App, frame: &mut Frame, area: Rect) {
    let current = app.wizard.step().index();
    let mut spans = vec![Span::raw(" ")];

    for (i, step) in WizardStep::FORM_STEPS.iter().enumerate() {
        let style = if i <= current {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("({}) {}", i + 1, step.title()), style));
        if i < WizardStep::FORM_STEPS.len() - 1 {
            spans.push(Span::styled("  →  ", Style::default().fg(Color::DarkGray)));
        }
    }
    spans.push(Span::styled("   Demo Mode", Style::default().fg(Color::Yellow)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_booking_form(app: &mut App, frame: &mut Frame, area: Rect) {
    let step = app.wizard.step();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", step.title()))
        .title_bottom(Line::from(format!(
            " {}n: {} ",
            if step.index() > 0 { "b: Back   " } else { "" },
            step.advance_label()
        )));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [description_area, fields_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(step.description()).style(Style::default().fg(Color::DarkGray)),
        description_area,
    );

    if step == WizardStep::ReviewConfirm {
        render_review(app, frame, fields_area);
        return;
    }

    let fields = step.fields();
    let editing = app.input_mode == InputMode::Editing;
    let selected = app.field_state.selected().unwrap_or(0);
    let constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    let rows = Layout::vertical(constraints).split(fields_area);

    for (i, field) in fields.iter().enumerate() {
        let Some(&row) = rows.get(i) else {
            break;
        };
        let focused = i == selected;
        let color = if focused && editing {
            Color::Yellow
        } else {
            border_color(focused)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", field.label()));

        if focused && editing {
            render_text_input(frame, row, block, &app.field_input, field.placeholder(), true);
        } else {
            let value = TextInput::with_value(&app.wizard.draft().value(*field));
            render_text_input(frame, row, block, &value, field.placeholder(), false);
        }
    }
}

fn render_review(app: &App, frame: &mut Frame, area: Rect) {
    let draft = app.wizard.draft();
    let label = Style::default().fg(Color::DarkGray);
    let heading = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled("Journey Details", heading))];
    for field in WizardStep::JourneyDetails.fields() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", field.label()), label),
            Span::raw(draft.value(*field)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Passenger Details", heading)));
    for field in WizardStep::PassengerInfo.fields() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", field.label()), label),
            Span::raw(draft.review_value(*field)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "⚠ This is a simulation - No real booking will be made",
        Style::default().fg(Color::Yellow),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_booking_sidebar(app: &App, frame: &mut Frame, area: Rect) {
    let service = app.wizard.service();
    let draft = app.wizard.draft();
    let label = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(Span::styled(service.train, Style::default().bold())),
        Line::from(Span::styled(service.class, label)),
        Line::default(),
        Line::from(format!("{} → {}", service.departure, service.arrival)),
        Line::from(format!("{} → {}", service.origin, service.destination)),
        Line::from(format!("Seat: {}", service.seat)),
        Line::default(),
        Line::from(vec![Span::styled("Base fare   ", label), Span::raw(format!("₹{}", service.price))]),
        Line::from(vec![Span::styled("Passengers  ", label), Span::raw(format!("×{}", draft.passengers))]),
        Line::from(vec![
            Span::styled("Total       ", Style::default().bold()),
            Span::styled(format!("₹{}", app.wizard.total()), Style::default().fg(Color::Green).bold()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Booking Summary ");

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_booking_complete(frame: &mut Frame, area: Rect, summary: &BookingSummary) {
    let label = Style::default().fg(Color::DarkGray);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {:<14}", name), label), Span::raw(value)])
    };

    let service = &summary.service;
    let lines = vec![
        Line::from(Span::styled(
            WizardStep::Complete.title(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(WizardStep::Complete.description(), label)),
        Line::default(),
        Line::from(Span::styled("Booking Summary", Style::default().bold())),
        row("Train:", service.train.to_string()),
        row("Route:", format!("{} → {}", service.origin, service.destination)),
        row("Date:", summary.date.clone()),
        row("Time:", format!("{} - {}", service.departure, service.arrival)),
        row("Passenger:", summary.passenger_name.clone()),
        row("Passengers:", summary.passengers.to_string()),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Total Amount:"), Style::default().bold()),
            Span::styled(format!("₹{}", summary.total), Style::default().fg(Color::Green).bold()),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "⚠ Simulation Mode - No Payment Processed",
            Style::default().fg(Color::Yellow),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("Press Enter to {}", WizardStep::Complete.advance_label()),
            Style::default().fg(Color::Cyan),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Confirmation ");

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_playground_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [left_area, right_area] = Layout::horizontal([
        Constraint::Percentage(65),
        Constraint::Percentage(35),
    ])
    .areas(area);

    let [prompt_area, instructions_area, response_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(9),
        Constraint::Min(0),
    ])
    .areas(left_area);

    let editing = app.input_mode == InputMode::Editing;

    // User prompt
    let prompt_focused = app.playground_focus == PlaygroundFocus::Prompt;
    let prompt_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if prompt_focused && editing {
            Color::Yellow
        } else {
            border_color(prompt_focused)
        }))
        .title(" User Prompt ");
    if prompt_focused && editing {
        render_text_input(frame, prompt_area, prompt_block, &app.playground_input, "", true);
    } else {
        let value = TextInput::with_value(&app.playground.prompt);
        render_text_input(
            frame,
            prompt_area,
            prompt_block,
            &value,
            "e.g., Book a train ticket from Chennai to Bangalore tomorrow",
            false,
        );
    }

    // System instructions
    let instructions_focused = app.playground_focus == PlaygroundFocus::Instructions;
    let verbose_label = if app.playground.verbose { " [verbose on] " } else { " [verbose off] " };
    let instructions_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if instructions_focused && editing {
            Color::Yellow
        } else {
            border_color(instructions_focused)
        }))
        .title(" System Instructions ")
        .title_bottom(Line::from(verbose_label).fg(if app.playground.verbose {
            Color::Green
        } else {
            Color::DarkGray
        }));
    if instructions_focused && editing {
        render_multiline_input(frame, instructions_area, instructions_block, &app.playground_input);
    } else {
        let instructions = Paragraph::new(app.playground.instructions.as_str())
            .block(instructions_block)
            .wrap(Wrap { trim: false });
        frame.render_widget(instructions, instructions_area);
    }

    // Response
    app.response_area = Some(response_area);
    let response_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" AI Response ");

    let response_text = if app.playground.is_running() {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        Text::from(Span::styled(
            format!("Running{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else if let Some(response) = app.playground.response() {
        Text::from(response.lines().map(parse_markdown_line).collect::<Vec<_>>())
    } else {
        Text::from(Span::styled(
            "Press r to run the prompt and see the AI response",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let response = Paragraph::new(response_text)
        .block(response_block)
        .wrap(Wrap { trim: false })
        .scroll((app.response_scroll, 0));
    frame.render_widget(response, response_area);

    // Examples and tips
    let [examples_area, tips_area] = Layout::vertical([
        Constraint::Length(EXAMPLE_PROMPTS.len() as u16 * 2 + 2),
        Constraint::Min(0),
    ])
    .areas(right_area);

    let examples_focused = app.playground_focus == PlaygroundFocus::Examples;
    let examples_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(examples_focused)))
        .title(" Example Prompts ");

    let items: Vec<ListItem> = EXAMPLE_PROMPTS
        .iter()
        .map(|example| {
            ListItem::new(vec![
                Line::from(Span::styled(example.title, Style::default().bold())),
                Line::from(Span::styled(example.description, Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(examples_block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, examples_area, &mut app.example_state);

    let tips = vec![
        Line::from("• Try specific queries with locations and dates for best results"),
        Line::from("• Modify system instructions to change agent personality"),
        Line::from("• Enable verbose mode for detailed explanations"),
        Line::from("• Compare responses between concise and verbose modes"),
    ];
    let tips_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Tips ");
    frame.render_widget(Paragraph::new(tips).block(tips_block).wrap(Wrap { trim: false }), tips_area);
}

fn render_notice(app: &App, frame: &mut Frame, area: Rect) {
    let Some(notice) = &app.notice else {
        return;
    };

    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };

    // Bottom-right corner, above the footer
    let width = (notice.text.chars().count().max(notice.title.len()) as u16 + 4).min(area.width);
    let height = 3;
    let popup_area = Rect::new(
        area.width.saturating_sub(width),
        area.height.saturating_sub(height + 1),
        width,
        height.min(area.height),
    );

    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", notice.title));
    frame.render_widget(Paragraph::new(notice.text.as_str()).block(block), popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use ticketbot_core::Config;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_markdown_bold_and_italic() {
        let line = parse_markdown_line("**From:** Chennai *soon*");
        assert_eq!(line_text(&line), "From: Chennai soon");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(line.spans[2].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_markdown_unclosed_is_literal() {
        let line = parse_markdown_line("price **985");
        assert_eq!(line_text(&line), "price **985");
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_instructions_cursor_stays_in_box() {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let mut app = App::new(&Config::default());
        app.screen = Screen::Playground;
        app.cycle_playground_focus();
        app.begin_playground_edit();
        assert!(app.playground_input.value.contains('\n'));

        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();

        // Instructions box spans rows 4..13 below the header and prompt box
        assert!((5..12).contains(&cursor.y), "cursor row {}", cursor.y);
        assert_eq!(cursor.y, 11);
        let last_line = app.playground.instructions.lines().last().unwrap_or_default();
        assert_eq!(cursor.x as usize, 1 + last_line.chars().count());
    }

    #[test]
    fn test_renders_every_screen() {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let mut app = App::new(&Config::default());

        for screen in Screen::ALL {
            app.screen = screen;
            terminal.draw(|frame| render(&mut app, frame)).unwrap();
        }
        assert!(buffer_text(&terminal).contains("Example Prompts"));

        app.screen = Screen::Booking;
        app.wizard_continue();
        app.wizard_continue();
        app.wizard_continue();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("Booking Summary"));
    }
}
