use std::ops::Range;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::filter::FilterMode;
use crate::notice::NoticeLevel;
use crate::render::{ListBody, TaskRow};
use crate::storage::KeyValueStore;

use super::app::{AppState, DeleteConfirmState};
use super::editor::{EditorKind, EditorState};

const CHECK_WIDTH: usize = 4;
const HELP_KEY_WIDTH: usize = 14;
const LABEL_WIDTH: usize = 10;

mod theme {
    use ratatui::style::Color;

    pub const FG: Color = Color::Rgb(228, 230, 222);
    pub const SUBTLE: Color = Color::Rgb(150, 156, 160);
    pub const DIM: Color = Color::Rgb(108, 114, 120);
    pub const CYAN: Color = Color::Rgb(102, 204, 204);
    pub const AMBER: Color = Color::Rgb(240, 190, 90);
    pub const RED: Color = Color::Rgb(235, 96, 96);
    pub const GREEN: Color = Color::Rgb(134, 200, 120);
    pub const BLUE: Color = Color::Rgb(110, 160, 240);
    pub const FRAME: Color = Color::Rgb(84, 110, 140);
}

const HELP_KEYS: &[(&str, &str)] = &[
    ("j/k or up/down", "move selection"),
    ("g/G", "first / last task"),
    ("a", "add task"),
    ("e/enter", "edit task"),
    ("space/x", "mark complete / incomplete"),
    ("d", "delete task"),
    ("1/2/3", "all / active / completed"),
    ("tab", "next filter"),
    ("q/esc", "quit"),
    ("?", "hide help"),
];

pub fn render<K: KeyValueStore>(frame: &mut Frame, app: &AppState<K>) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_tabs(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    if let Some(editor) = app.editor.as_ref() {
        render_editor_modal(frame, area, editor);
    }
    if let Some(state) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, state);
    }
}

fn render_tabs<K: KeyValueStore>(frame: &mut Frame, app: &AppState<K>, area: Rect) {
    let counts = &app.view.summary.counts;
    let mut spans = Vec::new();
    for (idx, mode) in FilterMode::ALL_MODES.iter().enumerate() {
        let count = match mode {
            FilterMode::All => counts.total,
            FilterMode::Active => counts.active,
            FilterMode::Completed => counts.completed,
        };
        let label = format!(" {} {} ({count}) ", idx + 1, tab_title(*mode));
        let style = if *mode == app.view.filter {
            Style::default()
                .fg(theme::CYAN)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme::SUBTLE)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn tab_title(mode: FilterMode) -> &'static str {
    match mode {
        FilterMode::All => "All",
        FilterMode::Active => "Active",
        FilterMode::Completed => "Completed",
    }
}

fn render_list<K: KeyValueStore>(frame: &mut Frame, app: &AppState<K>, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let help_lines = if app.show_help {
        build_help_lines(content_width)
    } else {
        Vec::new()
    };
    let help_reserved = if help_lines.is_empty() {
        0
    } else {
        help_lines.len() + 1
    };

    match &app.view.body {
        ListBody::Empty { message } => {
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(theme::SUBTLE),
            )));
        }
        ListBody::Rows { rows } => {
            let list_height = (area.height.saturating_sub(2) as usize).saturating_sub(help_reserved);
            for pos in list_window(rows.len(), app.selected, list_height) {
                lines.push(render_list_row(&rows[pos], pos == app.selected, content_width));
            }
        }
    }

    if !help_lines.is_empty() {
        lines.push(Line::from(""));
        lines.extend(help_lines);
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::FRAME))
            .title("Tasks"),
    );
    frame.render_widget(widget, area);
}

fn render_list_row(row: &TaskRow, selected: bool, width: usize) -> Line<'static> {
    let (check, check_style) = if row.completed {
        ("[x]", Style::default().fg(theme::GREEN))
    } else {
        ("[ ]", Style::default().fg(theme::SUBTLE))
    };
    let due = row.due.as_ref().map(|due| {
        let label = if due.overdue {
            format!("overdue: {}", due.label)
        } else {
            due.label.clone()
        };
        let style = if due.overdue {
            Style::default()
                .fg(theme::RED)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::CYAN)
        };
        (label, style)
    });
    let due_width = due
        .as_ref()
        .map(|(label, _)| label.chars().count() + 2)
        .unwrap_or(0);
    let text_width = width.saturating_sub(CHECK_WIDTH + due_width + 1);
    let text_style = if row.completed {
        Style::default()
            .fg(theme::DIM)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme::FG)
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(pad_text(check, CHECK_WIDTH - 1), check_style),
        Span::raw(" "),
        Span::styled(pad_text(&row.text, text_width), text_style),
    ];
    if let Some((label, style)) = due {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(label, style));
    }

    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }

    Line::from(spans)
}

fn render_footer<K: KeyValueStore>(frame: &mut Frame, app: &AppState<K>, area: Rect) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(theme::CYAN));
    let line = if let Some(notice) = app.notices.latest() {
        let style = match notice.level {
            NoticeLevel::Error => Style::default()
                .fg(theme::RED)
                .add_modifier(Modifier::BOLD),
            NoticeLevel::Warning => Style::default().fg(theme::AMBER),
            NoticeLevel::Success => Style::default().fg(theme::GREEN),
            NoticeLevel::Info => Style::default().fg(theme::BLUE),
        };
        let text = match &notice.description {
            Some(description) => format!("{}: {description}", notice.message),
            None => notice.message.clone(),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(text, style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.view.summary.text.clone(),
        Style::default().fg(theme::BLUE),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme::FRAME)),
        );
    frame.render_widget(widget, area);
}

fn render_editor_modal(frame: &mut Frame, area: Rect, editor: &EditorState) {
    let content_width = area.width.saturating_sub(8).min(72);
    let height = 10u16.min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let title = match editor.kind() {
        EditorKind::NewTask => "New Task",
        EditorKind::EditTask => "Edit Task",
    };
    let lines = build_editor_lines(editor, content_width.saturating_sub(2) as usize);
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, modal);
}

fn build_editor_lines(editor: &EditorState, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let value_width = width.saturating_sub(LABEL_WIDTH + 1);
    for (idx, field) in editor.fields().iter().enumerate() {
        let is_active = idx == editor.active_index();
        let mut spans = vec![
            Span::styled(
                pad_text(field.label, LABEL_WIDTH),
                Style::default().fg(theme::FG),
            ),
            Span::raw(" "),
        ];
        if is_active {
            spans.extend(value_with_caret_spans(
                &field.value,
                editor.cursor(),
                value_width,
                Style::default().fg(theme::FG),
            ));
        } else if field.value.is_empty() {
            let placeholder = if field.required {
                "<required>".to_string()
            } else {
                format!("({})", field.hint)
            };
            spans.push(Span::styled(
                truncate_text(&placeholder, value_width),
                Style::default().fg(theme::SUBTLE),
            ));
        } else {
            spans.push(Span::styled(
                truncate_text(&field.value, value_width),
                Style::default().fg(theme::FG),
            ));
        }
        lines.push(Line::from(spans));
    }

    if let Some(field) = editor.fields().get(editor.active_index()) {
        lines.push(Line::from(Span::styled(
            format!("{} {}", " ".repeat(LABEL_WIDTH), field.hint),
            Style::default().fg(theme::DIM),
        )));
    }

    if let Some(error) = editor.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default()
                .fg(theme::RED)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "tab next field  enter save  ctrl+u clear  esc cancel",
        Style::default().fg(theme::DIM),
    )));
    lines
}

fn render_delete_confirm_modal(frame: &mut Frame, area: Rect, state: &DeleteConfirmState) {
    let content_width = area.width.saturating_sub(8).min(64);
    let height = 7u16.min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let text_width = (content_width as usize).saturating_sub(4);
    let lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            "Are you sure you want to delete this task?",
            Style::default()
                .fg(theme::RED)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            truncate_text(&state.text, text_width),
            Style::default().fg(theme::FG),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y/enter confirm  esc/n cancel",
            Style::default().fg(theme::DIM),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Delete Task"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn build_help_lines(width: usize) -> Vec<Line<'static>> {
    let key_width = HELP_KEY_WIDTH.min(width);
    let desc_width = width.saturating_sub(HELP_KEY_WIDTH + 1);
    let mut lines = vec![Line::from(Span::styled(
        "Keys",
        Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(HELP_KEYS.iter().map(|(keys, desc)| {
        Line::from(vec![
            Span::styled(
                pad_text(keys, key_width),
                Style::default().fg(theme::BLUE).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(truncate_text(desc, desc_width), Style::default().fg(theme::SUBTLE)),
        ])
    }));
    lines
}

/// Spans for an input value with a reversed-video caret, scrolled so the
/// caret stays inside `width` columns.
fn value_with_caret_spans(
    value: &str,
    cursor: usize,
    width: usize,
    style: Style,
) -> Vec<Span<'static>> {
    if width == 0 {
        return Vec::new();
    }
    let chars: Vec<char> = value.chars().collect();
    let cursor = cursor.min(chars.len());

    // One extra column for the caret cell past the last character
    let cells = chars.len() + 1;
    let start = if cells <= width {
        0
    } else {
        (cursor + 1).saturating_sub(width).min(cells - width)
    };
    let end = (start + width).min(chars.len());

    let caret_style = style.add_modifier(Modifier::REVERSED);
    let before: String = chars[start..cursor].iter().collect();
    let caret = chars.get(cursor).copied().unwrap_or(' ');
    let after: String = chars.get(cursor + 1..end).unwrap_or_default().iter().collect();

    [
        (before, style),
        (caret.to_string(), caret_style),
        (after, style),
    ]
    .into_iter()
    .filter(|(text, _)| !text.is_empty())
    .map(|(text, style)| Span::styled(text, style))
    .collect()
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Rows `[start, end)` to draw so `selected` sits near the middle
fn list_window(total: usize, selected: usize, height: usize) -> Range<usize> {
    if total <= height {
        return 0..total;
    }
    let start = selected.saturating_sub(height / 2).min(total - height);
    start..start + height
}

fn pad_text(value: &str, width: usize) -> String {
    format!("{:<width$}", truncate_text(value, width))
}

fn truncate_text(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    match max {
        0 => String::new(),
        1 => "~".to_string(),
        _ => {
            let mut out: String = value.chars().take(max - 1).collect();
            out.push('~');
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_window_keeps_selection_visible() {
        assert_eq!(list_window(3, 2, 10), 0..3);
        assert_eq!(list_window(20, 19, 5), 15..20);
        assert_eq!(list_window(20, 10, 4), 8..12);
        assert_eq!(list_window(0, 0, 4), 0..0);
        assert_eq!(list_window(5, 0, 0), 0..0);
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_text("héllo wörld", 8), "héllo w~");
        assert_eq!(truncate_text("short", 8), "short");
        assert_eq!(pad_text("ab", 4), "ab  ");
    }

    fn span_texts(spans: &[Span<'static>]) -> Vec<String> {
        spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn caret_sits_on_cursor_character() {
        let spans = value_with_caret_spans("milk", 1, 20, Style::default());
        assert_eq!(span_texts(&spans), vec!["m", "i", "lk"]);
        assert!(spans[1].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn caret_scrolls_long_values() {
        let spans = value_with_caret_spans("abcdefghij", 10, 4, Style::default());
        assert_eq!(span_texts(&spans), vec!["hij", " "]);

        let spans = value_with_caret_spans("abcdefghij", 0, 4, Style::default());
        assert_eq!(span_texts(&spans), vec!["a", "bcd"]);
    }
}
