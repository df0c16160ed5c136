//! Render contract: visible tasks -> list view model.
//!
//! The view is rebuilt from scratch on every render; nothing is diffed. The
//! CLI prints it with [`render_lines`] and the terminal UI draws it with
//! ratatui, but both consume the same [`ListView`].

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::filter::{is_overdue_incomplete, FilterMode};
use crate::store::{count_tasks, TaskCounts};
use crate::task::{format_due_time, TaskRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub filter: FilterMode,
    pub body: ListBody,
    pub summary: CountSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListBody {
    Empty { message: String },
    Rows { rows: Vec<TaskRow> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DueBadge>,
    pub toggle_label: String,
    pub edit_label: String,
    pub delete_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueBadge {
    pub label: String,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountSummary {
    #[serde(flatten)]
    pub counts: TaskCounts,
    pub text: String,
}

impl ListView {
    pub fn rows(&self) -> &[TaskRow] {
        match &self.body {
            ListBody::Rows { rows } => rows,
            ListBody::Empty { .. } => &[],
        }
    }

    pub fn empty_message(&self) -> Option<&str> {
        match &self.body {
            ListBody::Empty { message } => Some(message),
            ListBody::Rows { .. } => None,
        }
    }
}

/// Build the view for `visible` (already filtered and sorted).
///
/// `all` feeds the count summary, which always covers the whole list.
pub fn render(
    visible: &[TaskRecord],
    all: &[TaskRecord],
    filter: FilterMode,
    now: NaiveDateTime,
) -> ListView {
    let body = if visible.is_empty() {
        ListBody::Empty {
            message: empty_message(filter).to_string(),
        }
    } else {
        ListBody::Rows {
            rows: visible.iter().map(|task| render_row(task, now)).collect(),
        }
    };

    ListView {
        filter,
        body,
        summary: summarize(all, filter),
    }
}

pub fn empty_message(filter: FilterMode) -> &'static str {
    match filter {
        FilterMode::All => "No tasks yet. Add one to get started!",
        FilterMode::Active => "No active tasks. Great job!",
        FilterMode::Completed => "No completed tasks yet.",
    }
}

pub fn render_row(task: &TaskRecord, now: NaiveDateTime) -> TaskRow {
    let next_state = if task.completed {
        "incomplete"
    } else {
        "complete"
    };
    TaskRow {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        due: due_badge(task, now),
        toggle_label: format!("Mark \"{}\" as {next_state}", task.text),
        edit_label: format!("Edit task \"{}\"", task.text),
        delete_label: format!("Delete task \"{}\"", task.text),
    }
}

fn due_badge(task: &TaskRecord, now: NaiveDateTime) -> Option<DueBadge> {
    let date = task.due_date?;
    let mut label = format_due_date(date, now.date());
    if let Some(time) = task.due_time {
        label.push_str(" at ");
        label.push_str(&format_due_time(time));
    }
    Some(DueBadge {
        label,
        overdue: is_overdue_incomplete(task, now),
    })
}

/// "Today", "Tomorrow", or e.g. "Mar 5, 2026"
pub fn format_due_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

pub fn summarize(all: &[TaskRecord], filter: FilterMode) -> CountSummary {
    let counts = count_tasks(all);
    let text = match filter {
        FilterMode::Active => format!("{} active {}", counts.active, plural(counts.active)),
        FilterMode::Completed => {
            format!("{} completed {}", counts.completed, plural(counts.completed))
        }
        FilterMode::All => format!(
            "{} {} ({} active, {} completed)",
            counts.total,
            plural(counts.total),
            counts.active,
            counts.completed
        ),
    };
    CountSummary { counts, text }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "task"
    } else {
        "tasks"
    }
}

/// Plain-text rendering for terminals without the interactive view
pub fn render_lines(view: &ListView) -> Vec<String> {
    let mut lines = Vec::new();
    match &view.body {
        ListBody::Empty { message } => lines.push(message.clone()),
        ListBody::Rows { rows } => {
            for row in rows {
                let check = if row.completed { "[x]" } else { "[ ]" };
                let mut line = format!("{check} {}  {}", row.id, row.text);
                if let Some(due) = &row.due {
                    line.push_str(&format!("  (due {})", due.label));
                    if due.overdue {
                        line.push_str(" OVERDUE");
                    }
                }
                lines.push(line);
            }
        }
    }
    lines.push(String::new());
    lines.push(view.summary.text.clone());
    lines
}
