//! tickit task command implementations
//!
//! Each command opens the file-backed store, runs one `TodoApp` operation and
//! reports through the shared output envelope.

use std::path::PathBuf;

use serde::Serialize;

use crate::app::{CommandOutcome, TaskInput, TodoApp};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::FilterMode;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::render::{render_lines, render_row, CountSummary, ListView, TaskRow};
use crate::storage::{FileKv, TaskStorage};
use crate::task::{format_due_time, parse_due_date, parse_due_time, TaskRecord};

/// Resolved settings shared by every task command
pub struct Context {
    pub store_dir: PathBuf,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

impl Context {
    /// Open the task store under `store_dir`, creating the directory if needed
    pub fn open_app(&self) -> Result<TodoApp<FileKv>> {
        std::fs::create_dir_all(&self.store_dir)?;
        let backend = FileKv::new(&self.store_dir)
            .with_lock_timeout(self.config.storage.lock_timeout_ms);
        let storage = TaskStorage::with_key(backend, self.config.storage.key.trim());
        let app = TodoApp::open(storage).with_filter(self.config.display.default_filter);
        tracing::debug!(
            store = %self.store_dir.display(),
            tasks = app.store().len(),
            "opened task store"
        );
        Ok(app)
    }

    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

/// Options for `tickit add`
pub struct AddOptions {
    pub text: String,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Options for `tickit edit`
pub struct EditOptions {
    pub id: String,
    pub text: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub clear_date: bool,
    pub clear_time: bool,
}

#[derive(Serialize)]
struct TaskChangeReport<'a> {
    action: &'static str,
    task: &'a TaskRecord,
    summary: &'a CountSummary,
}

#[derive(Serialize)]
struct ShowReport<'a> {
    task: &'a TaskRecord,
    row: TaskRow,
}

pub fn run_add(context: &Context, options: AddOptions) -> Result<()> {
    let mut app = context.open_app()?;
    let today = app.now().date();
    let due_date = options
        .date
        .as_deref()
        .map(|raw| parse_due_date(raw, today))
        .transpose()?;
    let due_time = options.time.as_deref().map(parse_due_time).transpose()?;

    let outcome = app.add(TaskInput::new(options.text).due(due_date, due_time))?;
    report_change(context, &app, "add", "added", outcome)
}

pub fn run_edit(context: &Context, options: EditOptions) -> Result<()> {
    let mut app = context.open_app()?;
    let id = app.resolve_id(&options.id)?;
    let current = app.begin_edit(&id)?;
    let today = app.now().date();

    let mut input = current;
    if let Some(text) = options.text {
        input.text = text;
    }
    if options.clear_date {
        input.due_date = None;
    } else if let Some(raw) = options.date.as_deref() {
        input.due_date = Some(parse_due_date(raw, today)?);
    }
    if options.clear_time {
        input.due_time = None;
    } else if let Some(raw) = options.time.as_deref() {
        input.due_time = Some(parse_due_time(raw)?);
    }

    let outcome = app.submit(input)?;
    report_change(context, &app, "edit", "updated", outcome)
}

pub fn run_toggle(context: &Context, id: &str) -> Result<()> {
    let mut app = context.open_app()?;
    let id = app.resolve_id(id)?;
    let outcome = app.toggle(&id)?;
    let action = if outcome.task.completed {
        "completed"
    } else {
        "reopened"
    };
    report_change(context, &app, "toggle", action, outcome)
}

pub fn run_rm(context: &Context, id: &str) -> Result<()> {
    let mut app = context.open_app()?;
    let id = app.resolve_id(id)?;
    let outcome = app.delete(&id)?;
    report_change(context, &app, "rm", "deleted", outcome)
}

pub fn run_show(context: &Context, id: &str) -> Result<()> {
    let app = context.open_app()?;
    let id = app.resolve_id(id)?;
    let task = app
        .store()
        .get(&id)
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;
    let row = render_row(task, app.now());

    let mut human = HumanOutput::new(format!("tickit show: {}", task.text));
    human.push_summary("id", task.id.clone());
    human.push_summary("status", if task.completed { "completed" } else { "active" });
    human.push_summary("created", task.created_at.to_rfc3339());
    if let Some(due) = &row.due {
        let label = if due.overdue {
            format!("{} (overdue)", due.label)
        } else {
            due.label.clone()
        };
        human.push_summary("due", label);
    } else if let Some(time) = task.due_time {
        // A time without a date never counts as due
        human.push_summary("due time", format_due_time(time));
    }
    push_load_warnings(&mut human, &app);

    let report = ShowReport { task, row };
    emit_success(context.output(), "show", &report, Some(&human))
}

pub fn run_list(context: &Context, filter: Option<FilterMode>) -> Result<()> {
    let mut app = context.open_app()?;
    let view = match filter {
        Some(filter) => app.set_filter(filter),
        None => app.view(),
    };

    let mut human = HumanOutput::new(render_lines(&view).join("\n"));
    push_load_warnings(&mut human, &app);
    if view.rows().is_empty() && app.store().is_empty() {
        human.push_next_step("tickit add \"<task>\"");
    }

    emit_success(context.output(), "list", &view, Some(&human))
}

pub fn run_count(context: &Context, filter: Option<FilterMode>) -> Result<()> {
    let mut app = context.open_app()?;
    let view: ListView = match filter {
        Some(filter) => app.set_filter(filter),
        None => app.view(),
    };

    let mut human = HumanOutput::new(view.summary.text.clone());
    push_load_warnings(&mut human, &app);

    emit_success(context.output(), "count", &view.summary, Some(&human))
}

/// Report a mutation, failing when it could not be persisted.
///
/// The process exits right after, so an unsaved change is a lost change.
fn report_change(
    context: &Context,
    app: &TodoApp<FileKv>,
    command: &str,
    action: &'static str,
    outcome: CommandOutcome,
) -> Result<()> {
    if !outcome.saved {
        let reason = outcome.warnings().join("; ");
        return Err(Error::OperationFailed(format!(
            "task was {action} but not saved ({reason})"
        )));
    }

    let task = &outcome.task;
    let mut human = HumanOutput::new(format!("tickit {command}: {action} \"{}\"", task.text));
    human.push_summary("id", task.id.clone());
    if let Some(due) = render_row(task, app.now()).due {
        human.push_summary("due", due.label);
    }
    human.push_summary("tasks", outcome.view.summary.text.clone());
    push_load_warnings(&mut human, app);

    let report = TaskChangeReport {
        action,
        task,
        summary: &outcome.view.summary,
    };
    emit_success(context.output(), command, &report, Some(&human))
}

fn push_load_warnings<K>(human: &mut HumanOutput, app: &TodoApp<K>)
where
    K: crate::storage::KeyValueStore,
{
    for warning in app.load_warnings() {
        human.push_warning(warning.clone());
    }
}
