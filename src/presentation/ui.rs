use crate::application::{App, AppMode, FormField};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render_ui(f: &mut Frame, app: &App) {
    match app.mode {
        AppMode::Loading => render_loading(f),
        AppMode::LoginRedirect => render_login_redirect(f, app),
        AppMode::Fatal => render_fatal(f, app),
        AppMode::Submitted => render_success(f, app),
        AppMode::Form | AppMode::Editing | AppMode::Submitting | AppMode::Help => {
            render_form(f, app)
        }
    }

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_form(f: &mut Frame, app: &App) {
    let banner_height = if app.error_banner.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_welcome(f, app, chunks[1]);
    if let Some(ref message) = app.error_banner {
        let banner = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Error"));
        f.render_widget(banner, chunks[2]);
    }
    render_fields(f, app, chunks[3]);
    render_status_bar(f, app, chunks[4]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let customer = app
        .identity
        .as_ref()
        .map(|identity| identity.display_name.as_str())
        .unwrap_or("Customer");
    let header = Paragraph::new(format!("FreightForward | {}", customer))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_welcome(f: &mut Frame, app: &App, area: Rect) {
    let customer = app
        .identity
        .as_ref()
        .map(|identity| identity.display_name.as_str())
        .unwrap_or("Customer");
    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Welcome, {}!", customer),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(
            "Need to move cargo? Fill in the details below to receive competitive bids from verified agents.",
        ),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(welcome, area);
}

fn render_fields(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    for field in FormField::ALL {
        let focused = app.focused == field;
        let editing = focused && matches!(app.mode, AppMode::Editing);

        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let value_style = if editing {
            Style::default().fg(Color::Green)
        } else if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };

        let value = if editing {
            format!("{}_", app.input)
        } else {
            field_value(app, field)
        };

        let marker = if focused { ">" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!("{} {:<18}", marker, field_label(field)), label_style),
            Span::styled(value, value_style),
        ]));
        lines.push(Line::from(""));
    }

    let details = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Shipment Details"));
    f.render_widget(details, area);
}

fn field_label(field: FormField) -> String {
    let required = matches!(
        field,
        FormField::Pickup | FormField::Dropoff | FormField::Weight
    );
    if required {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    }
}

fn field_value(app: &App, field: FormField) -> String {
    match field {
        FormField::Pickup => placeholder(&app.draft.pickup, "Where are we picking up?"),
        FormField::Dropoff => placeholder(&app.draft.dropoff, "Where is the destination?"),
        FormField::CargoType => format!("< {} >", app.draft.cargo_category.label()),
        FormField::Weight => placeholder(&app.draft.weight, "e.g. 500kg (Max 1 ton)"),
        FormField::Photo => placeholder(&app.draft.photo_name, "(optional) path to a cargo photo"),
    }
}

fn placeholder(value: &str, hint: &str) -> String {
    if value.is_empty() {
        hint.to_string()
    } else {
        value.to_string()
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Form => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Tab/↑↓: move | Enter: edit | ←→: cargo type | s: submit | Ctrl+S/O: save/load draft | ?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => format!(
            "Editing {}: {} (Enter to save, Esc to cancel, Ctrl+V to paste)",
            app.focused.label(),
            app.input
        ),
        AppMode::Submitting => "Submitting Request...".to_string(),
        AppMode::Help => "↑↓/jk: scroll | Esc/q: close help".to_string(),
        _ => String::new(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Submitting => Style::default().fg(Color::Yellow),
            AppMode::Help => Style::default().fg(Color::Cyan),
            _ => Style::default(),
        });
    f.render_widget(input, area);
}

fn render_loading(f: &mut Frame) {
    let area = centered_rect(f.area(), 60, 20);
    let loading = Paragraph::new("Initializing FreightForward...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Blue))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

fn render_login_redirect(f: &mut Frame, app: &App) {
    let area = centered_rect(f.area(), 80, 50);
    let url = app.login_url.as_deref().unwrap_or("");
    let text = vec![
        Line::from(Span::styled(
            "Login required",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Open the following URL to sign in with your LINE account:"),
        Line::from(Span::styled(url.to_string(), Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from("Then set FRF_LINE_ACCESS_TOKEN and restart the client."),
        Line::from("Press q to quit."),
    ];
    let redirect = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("FreightForward"));
    f.render_widget(redirect, area);
}

fn render_fatal(f: &mut Frame, app: &App) {
    let area = centered_rect(f.area(), 80, 40);
    let message = app.fatal_error.as_deref().unwrap_or("Unknown startup error");
    let text = vec![
        Line::from(Span::styled(
            "Failed to start FreightForward",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from("Check your configuration and restart. Press q to quit."),
    ];
    let fatal = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"));
    f.render_widget(fatal, area);
}

fn render_success(f: &mut Frame, app: &App) {
    let area = centered_rect(f.area(), 70, 50);
    let closing = if app.close_notice {
        "Running outside the LINE client, this window won't close automatically. Press q to exit."
    } else if app.in_client {
        "Closing window..."
    } else {
        "You can close this window now."
    };
    let text = vec![
        Line::from(Span::styled(
            "Request Submitted!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            "Your freight request has been sent to our agents. You will be notified of incoming bids shortly.",
        ),
        Line::from(""),
        Line::from(Span::styled(closing, Style::default().fg(Color::DarkGray))),
    ];
    let success = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("FreightForward"));
    f.render_widget(success, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("FreightForward Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = (area.height * percent_y / 100).max(5);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn get_help_text() -> String {
    r#"FREIGHTFORWARD TERMINAL CLIENT

=== WHAT THIS DOES ===
Submit a freight-shipping request to the FreightForward marketplace.
Verified agents will review your request and respond with bids in the
LINE chat you signed in with.

=== FORM FIELDS ===
Pickup Location *   Where the cargo is collected
Dropoff Location *  Where the cargo is delivered
Cargo Type          One of the supported categories (cycle with ←/→)
Est. Weight *       Free text, e.g. "500kg" (max 1 ton)
Cargo Photo         Optional. Enter a path; only the file name is kept

Fields marked * are required before a request can be submitted.

=== NAVIGATION ===
Tab / ↓             Focus next field
Shift+Tab / ↑       Focus previous field
Enter               Edit the focused field (or cycle cargo type)
← / →               Cycle cargo type when it is focused

=== EDITING A FIELD ===
Enter               Save the value into the draft
Esc                 Cancel without saving
Ctrl+V              Paste from the system clipboard
Arrows, Home, End   Move the cursor

=== SUBMITTING ===
s                   Submit the request (disabled while one is in flight)
                    On success the window closes automatically after a
                    short delay when running inside the LINE client.
Esc                 Dismiss a submission error banner

=== DRAFTS ===
Ctrl+S              Save the current draft to freight-request.json
Ctrl+O              Load a previously saved draft

=== OTHER ===
F1 or ?             Show this help (scroll with ↑↓, j/k)
q                   Quit (not while editing or submitting)"#
        .to_string()
}
