//! In-memory task store.
//!
//! `TaskStore` owns the authoritative, insertion-ordered list of tasks and is
//! the only place records are mutated. It performs no I/O: persisting and
//! re-rendering after a mutation is the caller's job (see [`crate::app`]).

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::error::{Error, Result};
use crate::task::{generate_task_id, normalize_text, truncate_to_minute, TaskRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<TaskRecord>,
    issued_ids: HashSet<String>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from previously persisted records.
    ///
    /// Later duplicates of an id are dropped so uniqueness holds from the start.
    pub fn from_records(records: Vec<TaskRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            if !store.issued_ids.insert(record.id.clone()) {
                tracing::warn!(id = %record.id, "dropping task with duplicate id");
                continue;
            }
            store.tasks.push(record);
        }
        store
    }

    pub fn create(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
        due_time: Option<NaiveTime>,
    ) -> Result<TaskRecord> {
        let text = normalize_text(text)?;
        let id = self.next_id();
        let record = TaskRecord::new(id, text, Utc::now(), due_date, due_time);
        self.tasks.push(record.clone());
        Ok(record)
    }

    pub fn update(
        &mut self,
        id: &str,
        text: &str,
        due_date: Option<NaiveDate>,
        due_time: Option<NaiveTime>,
    ) -> Result<TaskRecord> {
        let text = normalize_text(text)?;
        let task = self.find_mut(id)?;
        task.text = text;
        task.due_date = due_date;
        task.due_time = due_time.map(truncate_to_minute);
        Ok(task.clone())
    }

    pub fn toggle_complete(&mut self, id: &str) -> Result<TaskRecord> {
        let task = self.find_mut(id)?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<TaskRecord> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        Ok(self.tasks.remove(index))
    }

    /// All tasks in insertion order
    pub fn list(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> TaskCounts {
        count_tasks(&self.tasks)
    }

    /// Resolve a full id or a unique id prefix.
    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        let needle = prefix.trim();
        if needle.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }
        if self.get(needle).is_some() {
            return Ok(needle.to_string());
        }

        let lowered = needle.to_ascii_lowercase();
        let matches: Vec<&TaskRecord> = self
            .tasks
            .iter()
            .filter(|task| task.id.to_ascii_lowercase().starts_with(&lowered))
            .collect();
        match matches.as_slice() {
            [] => Err(Error::TaskNotFound(needle.to_string())),
            [task] => Ok(task.id.clone()),
            _ => Err(Error::AmbiguousId {
                prefix: needle.to_string(),
                matches: matches.len(),
            }),
        }
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut TaskRecord> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    fn next_id(&mut self) -> String {
        loop {
            let id = generate_task_id();
            if self.issued_ids.insert(id.clone()) {
                return id;
            }
        }
    }
}

pub fn count_tasks(tasks: &[TaskRecord]) -> TaskCounts {
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskCounts {
        total: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}
