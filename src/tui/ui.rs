use crate::contact::Contact;
use crate::tui::app::App;
use crate::tui::colors;
use crate::view::{self, View};
use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use unicode_width::UnicodeWidthStr;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SEARCH_PREFIX: &str = " \u{1F50D} ";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Connection info
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // header row + no borders
    app.table.visible_rows = chunks[2].height.saturating_sub(1) as usize;

    draw_info_strip(frame, app, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);
    draw_body(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.search.focused {
        let prefix = SEARCH_PREFIX.width() as u16;
        let cursor_x = chunks[1].x + 1 + prefix + app.search.cursor_column();
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position(Position::new(
            cursor_x.min(chunks[1].right().saturating_sub(2)),
            cursor_y,
        ));
    }
}

fn spinner(app: &App) -> &'static str {
    SPINNER[app.spinner_frame % SPINNER.len()]
}

fn draw_info_strip(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.diagnostics.status;
    let mut spans = vec![
        Span::raw(" Connection Status: "),
        Span::styled(
            status.label(),
            Style::default()
                .fg(colors::connection_color(status))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(count) = app.diagnostics.contact_count {
        spans.push(Span::raw(format!("   Total Contacts: {}", count)));
    }

    let line = Line::from(spans);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::White).bg(colors::STRIP_BG)),
        area,
    );
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let machine = app.fetch.machine();
    if machine.is_loading() && !machine.is_initial_loading() {
        block = block.title_top(
            Line::from(format!(" {} ", spinner(app)))
                .right_aligned()
                .style(Style::default().fg(Color::Cyan)),
        );
    }

    let line = if app.search.query.is_empty() {
        Line::from(vec![
            Span::raw(SEARCH_PREFIX),
            Span::styled("Search contacts...", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(format!("{}{}", SEARCH_PREFIX, app.search.query))
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn draw_body(frame: &mut Frame, app: &App, area: Rect) {
    let presentation = view::select(app.fetch.machine(), app.debouncer.value());

    match presentation.view {
        View::FullPageSpinner => {
            let text = format!("{} Loading contacts...", spinner(app));
            draw_centered(frame, area, Line::from(text).style(Style::default().fg(Color::Cyan)));
        }
        View::ErrorPanel { message } => draw_error_panel(frame, message, area),
        View::Empty { message } => {
            draw_centered(frame, area, Line::from(message).style(Style::default().fg(Color::Gray)));
        }
        View::Table { contacts } => draw_table(frame, app, contacts, area),
    }
}

fn draw_centered(frame: &mut Frame, area: Rect, line: Line) {
    let y = area.y + area.height.saturating_sub(1) / 2;
    let row = Rect::new(area.x, y, area.width, 1);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
}

fn draw_error_panel(frame: &mut Frame, message: &str, area: Rect) {
    let width = area.width.saturating_sub(4).min(60);
    let panel = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + 1,
        width,
        area.height.saturating_sub(1).min(6),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ");

    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(Color::LightRed))),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("r", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to try again"),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        panel,
    );
}

fn draw_table(frame: &mut Frame, app: &App, contacts: &[Contact], area: Rect) {
    let header = Row::new(["Name \u{25B2}", "Email", "Phone", "Company"].map(|name| {
        Cell::from(name).style(
            Style::default()
                .fg(Color::White)
                .bg(colors::BAR_BG)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1);

    // Build visible rows only
    let start = app.table.scroll_offset.min(contacts.len());
    let end = (start + app.table.visible_rows).min(contacts.len());

    let rows: Vec<Row> = contacts[start..end]
        .iter()
        .enumerate()
        .map(|(visual_idx, contact)| {
            let is_selected = !app.search.focused && app.table.selected == Some(start + visual_idx);

            // Alternating row background
            let bg = if is_selected {
                colors::SELECTED_BG
            } else if visual_idx % 2 == 1 {
                colors::STRIPE_BG
            } else {
                Color::Reset
            };
            let name_modifier = if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            };

            Row::new(vec![
                Cell::from(contact.name.as_str()).style(
                    Style::default()
                        .fg(Color::White)
                        .bg(bg)
                        .add_modifier(name_modifier | Modifier::BOLD),
                ),
                Cell::from(contact.email.as_str()).style(Style::default().fg(Color::LightBlue).bg(bg)),
                Cell::from(contact.phone.as_str()).style(Style::default().fg(Color::Gray).bg(bg)),
                Cell::from(contact.company.as_str()).style(Style::default().fg(Color::Green).bg(bg)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(4),
        Constraint::Length(16),
        Constraint::Fill(3),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE));

    frame.render_widget(table, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let machine = app.fetch.machine();
    let left_text = if machine.is_initial_loading() {
        " Loading...".to_string()
    } else {
        let mut text = format!(" {} contacts", machine.contacts().len());
        if let Some(at) = machine.updated_at() {
            text.push_str(&format!(" | updated {}", at.format("%H:%M:%S")));
        }
        text
    };

    let right_text = if machine.error().is_some() {
        " r:Retry  Tab:Search  Esc:Back  Ctrl+Q:Quit "
    } else {
        " Tab:Search/Table  \u{2191}\u{2193}:Move  Esc:Clear  Ctrl+Q:Quit "
    };

    // Build the status line: left-aligned text + padding + right-aligned text
    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        // Not enough space, just show left text
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::BAR_BG));

    frame.render_widget(status, area);
}
