//! Filter and sort policy for the visible task list.
//!
//! Everything here is pure: given the full list, a filter mode and the current
//! local time, it yields the ordered subset to display.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::task::TaskRecord;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 3] =
        [FilterMode::All, FilterMode::Active, FilterMode::Completed];

    pub fn matches(&self, task: &TaskRecord) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !task.completed,
            FilterMode::Completed => task.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Completed => "completed",
        }
    }

    /// Next mode in All -> Active -> Completed -> All order
    pub fn next(&self) -> FilterMode {
        match self {
            FilterMode::All => FilterMode::Active,
            FilterMode::Active => FilterMode::Completed,
            FilterMode::Completed => FilterMode::All,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "completed" => Ok(FilterMode::Completed),
            other => Err(Error::InvalidArgument(format!(
                "unknown filter '{other}' (expected all|active|completed)"
            ))),
        }
    }
}

/// True when the task's deadline is strictly before `now`.
///
/// Completion is not considered here; see [`is_overdue_incomplete`].
pub fn is_overdue(task: &TaskRecord, now: NaiveDateTime) -> bool {
    task.deadline().is_some_and(|deadline| deadline < now)
}

pub fn is_overdue_incomplete(task: &TaskRecord, now: NaiveDateTime) -> bool {
    !task.completed && is_overdue(task, now)
}

/// Total order used for display.
///
/// Overdue incomplete tasks lead; dated tasks follow by date, then time (timed
/// before untimed on the same day); undated tasks trail, newest first. Ties at
/// any level fall back to newest-first creation, then id.
pub fn compare_tasks(left: &TaskRecord, right: &TaskRecord, now: NaiveDateTime) -> Ordering {
    let left_overdue = is_overdue_incomplete(left, now);
    let right_overdue = is_overdue_incomplete(right, now);

    right_overdue
        .cmp(&left_overdue)
        .then_with(|| compare_due(left, right))
        .then_with(|| right.created_at.cmp(&left.created_at))
        .then_with(|| left.id.cmp(&right.id))
}

fn compare_due(left: &TaskRecord, right: &TaskRecord) -> Ordering {
    match (left.due_date, right.due_date) {
        (Some(left_date), Some(right_date)) => left_date.cmp(&right_date).then_with(|| {
            match (left.due_time, right.due_time) {
                (Some(left_time), Some(right_time)) => left_time.cmp(&right_time),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_tasks(tasks: &mut [TaskRecord], now: NaiveDateTime) {
    tasks.sort_by(|left, right| compare_tasks(left, right, now));
}

/// Filter then sort: the list the render step displays
pub fn visible_tasks(tasks: &[TaskRecord], mode: FilterMode, now: NaiveDateTime) -> Vec<TaskRecord> {
    let mut visible: Vec<TaskRecord> = tasks
        .iter()
        .filter(|task| mode.matches(task))
        .cloned()
        .collect();
    sort_tasks(&mut visible, now);
    visible
}
