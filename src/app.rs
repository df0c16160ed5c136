//! Command handlers.
//!
//! `TodoApp` turns user actions into task store operations and then runs the
//! fixed follow-up sequence: persist, recompute the visible list, re-render.
//! A failed save is reported as a warning notice; the in-memory change stands.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};
use crate::filter::{visible_tasks, FilterMode};
use crate::notice::Notice;
use crate::render::{render, ListView};
use crate::storage::{KeyValueStore, TaskStorage};
use crate::store::TaskStore;
use crate::task::TaskRecord;

/// Text and due fields as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub text: String,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
}

impl TaskInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn due(mut self, date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        self.due_date = date;
        self.due_time = time;
        self
    }

    fn from_record(task: &TaskRecord) -> Self {
        Self {
            text: task.text.clone(),
            due_date: task.due_date,
            due_time: task.due_time,
        }
    }
}

/// What a successful command changed and what to show next
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub task: TaskRecord,
    pub notices: Vec<Notice>,
    pub view: ListView,
    /// False when the change could not be persisted
    pub saved: bool,
}

impl CommandOutcome {
    pub fn warnings(&self) -> Vec<String> {
        self.notices
            .iter()
            .filter(|notice| notice.level == crate::notice::NoticeLevel::Warning)
            .map(|notice| match &notice.description {
                Some(description) => format!("{}: {description}", notice.message),
                None => notice.message.clone(),
            })
            .collect()
    }
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct TodoApp<K> {
    store: TaskStore,
    storage: TaskStorage<K>,
    filter: FilterMode,
    editing: Option<String>,
    load_warnings: Vec<String>,
    clock: fn() -> NaiveDateTime,
}

impl<K: KeyValueStore> TodoApp<K> {
    /// Load the persisted list and start with the `All` filter
    pub fn open(storage: TaskStorage<K>) -> Self {
        let report = storage.load_report();
        let load_warnings = report.warnings();
        Self {
            store: TaskStore::from_records(report.tasks),
            storage,
            filter: FilterMode::All,
            editing: None,
            load_warnings,
            clock: local_now,
        }
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the wall clock used for overdue checks
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn storage(&self) -> &TaskStorage<K> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut TaskStorage<K> {
        &mut self.storage
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Problems found while loading (reset payload, dropped entries)
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        self.store.resolve_id(prefix)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn add(&mut self, input: TaskInput) -> Result<CommandOutcome> {
        let task = self
            .store
            .create(&input.text, input.due_date, input.due_time)?;
        tracing::info!(id = %task.id, "task added");
        let notice = Notice::success("Task added successfully")
            .with_description(format!("\"{}\" has been added to your list", task.text));
        Ok(self.finish(task, notice))
    }

    pub fn update(&mut self, id: &str, input: TaskInput) -> Result<CommandOutcome> {
        let old_text = self.store.get(id).map(|task| task.text.clone());
        let task = self
            .store
            .update(id, &input.text, input.due_date, input.due_time)?;
        tracing::info!(id = %task.id, "task updated");
        let old_text = old_text.unwrap_or_else(|| task.text.clone());
        let notice = Notice::success("Task updated successfully")
            .with_description(format!("\"{old_text}\" has been updated"));
        Ok(self.finish(task, notice))
    }

    pub fn toggle(&mut self, id: &str) -> Result<CommandOutcome> {
        let task = self.store.toggle_complete(id)?;
        tracing::info!(id = %task.id, completed = task.completed, "task toggled");
        let message = if task.completed {
            "Task marked as completed"
        } else {
            "Task marked as active"
        };
        let notice = Notice::info(message).with_description(format!("\"{}\"", task.text));
        Ok(self.finish(task, notice))
    }

    pub fn delete(&mut self, id: &str) -> Result<CommandOutcome> {
        let task = self.store.delete(id)?;
        tracing::info!(id = %task.id, "task deleted");
        if self.editing.as_deref() == Some(task.id.as_str()) {
            self.editing = None;
        }
        let notice = Notice::success("Task deleted")
            .with_description(format!("\"{}\" has been removed", task.text));
        Ok(self.finish(task, notice))
    }

    // =========================================================================
    // Edit session
    // =========================================================================

    /// Enter edit mode for `id`, returning its current fields to prefill
    pub fn begin_edit(&mut self, id: &str) -> Result<TaskInput> {
        let task = self
            .store
            .get(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let input = TaskInput::from_record(task);
        self.editing = Some(task.id.clone());
        Ok(input)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Submit the input form: update while editing, otherwise add.
    ///
    /// The edit session survives a failed submit so the input can be fixed.
    pub fn submit(&mut self, input: TaskInput) -> Result<CommandOutcome> {
        match self.editing.clone() {
            Some(id) => {
                let outcome = self.update(&id, input)?;
                self.editing = None;
                Ok(outcome)
            }
            None => self.add(input),
        }
    }

    // =========================================================================
    // View
    // =========================================================================

    pub fn set_filter(&mut self, filter: FilterMode) -> ListView {
        self.filter = filter;
        self.view()
    }

    pub fn view(&self) -> ListView {
        self.view_at(self.now())
    }

    pub fn view_at(&self, now: NaiveDateTime) -> ListView {
        let visible = visible_tasks(self.store.list(), self.filter, now);
        render(&visible, self.store.list(), self.filter, now)
    }

    /// Persist, then re-render
    fn finish(&mut self, task: TaskRecord, notice: Notice) -> CommandOutcome {
        let mut notices = vec![notice];
        let saved = match self.storage.save(self.store.list()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to save tasks");
                notices.push(
                    Notice::warning("Failed to save tasks").with_description(err.to_string()),
                );
                false
            }
        };
        CommandOutcome {
            task,
            notices,
            view: self.view(),
            saved,
        }
    }
}
