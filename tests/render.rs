use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tickit::filter::{visible_tasks, FilterMode};
use tickit::render::{render, render_lines, render_row, ListBody};
use tickit::task::TaskRecord;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 10)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("now")
}

fn record(id: &str, text: &str, due: Option<(u32, Option<(u32, u32)>)>) -> TaskRecord {
    let created = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().expect("created");
    let date = due.map(|(d, _)| NaiveDate::from_ymd_opt(2026, 3, d).expect("date"));
    let time = due
        .and_then(|(_, time)| time)
        .map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).expect("time"));
    TaskRecord::new(id, text, created, date, time)
}

#[test]
fn empty_state_message_depends_on_filter() {
    let none: Vec<TaskRecord> = Vec::new();
    let cases = [
        (FilterMode::All, "No tasks yet. Add one to get started!"),
        (FilterMode::Active, "No active tasks. Great job!"),
        (FilterMode::Completed, "No completed tasks yet."),
    ];
    for (mode, message) in cases {
        let view = render(&none, &none, mode, now());
        assert_eq!(view.empty_message(), Some(message));
        assert!(view.rows().is_empty());
    }
}

#[test]
fn summary_counts_whole_list_regardless_of_filter() {
    let mut done = record("d", "Done thing", None);
    done.completed = true;
    let all = vec![record("a", "Open one", None), record("b", "Open two", None), done];

    let visible = visible_tasks(&all, FilterMode::Completed, now());
    let view = render(&visible, &all, FilterMode::Completed, now());
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.summary.text, "1 completed task");
    assert_eq!(view.summary.counts.total, 3);

    let view = render(&all, &all, FilterMode::All, now());
    assert_eq!(view.summary.text, "3 tasks (2 active, 1 completed)");

    let visible = visible_tasks(&all, FilterMode::Active, now());
    let view = render(&visible, &all, FilterMode::Active, now());
    assert_eq!(view.summary.text, "2 active tasks");
}

#[test]
fn rows_carry_labels_and_due_badges() {
    let all = vec![
        record("late", "Pay bill", Some((9, Some((8, 5))))),
        record("today", "Stand-up", Some((10, None))),
        record("soon", "Demo", Some((11, Some((15, 0))))),
        record("later", "Trip", Some((25, None))),
    ];
    let visible = visible_tasks(&all, FilterMode::All, now());
    let view = render(&visible, &all, FilterMode::All, now());
    let rows = view.rows();

    assert_eq!(rows[0].id, "late");
    let badge = rows[0].due.as_ref().expect("badge");
    assert_eq!(badge.label, "Mar 9, 2026 at 08:05");
    assert!(badge.overdue);
    assert_eq!(rows[0].toggle_label, "Mark \"Pay bill\" as complete");
    assert_eq!(rows[0].edit_label, "Edit task \"Pay bill\"");
    assert_eq!(rows[0].delete_label, "Delete task \"Pay bill\"");

    assert_eq!(rows[1].due.as_ref().map(|b| b.label.as_str()), Some("Today"));
    assert_eq!(
        rows[2].due.as_ref().map(|b| b.label.as_str()),
        Some("Tomorrow at 15:00")
    );
    assert_eq!(
        rows[3].due.as_ref().map(|b| b.label.as_str()),
        Some("Mar 25, 2026")
    );
}

#[test]
fn completed_overdue_row_is_not_flagged() {
    let mut task = record("x", "Old", Some((1, None)));
    task.completed = true;
    let all = vec![task];
    let view = render(&all, &all, FilterMode::All, now());
    let row = &view.rows()[0];
    assert!(!row.due.as_ref().expect("badge").overdue);
    assert_eq!(row.toggle_label, "Mark \"Old\" as incomplete");
}

#[test]
fn time_without_date_has_no_badge() {
    let mut task = record("f", "Floating", None);
    task.due_time = NaiveTime::from_hms_opt(6, 30, 0);
    let row = render_row(&task, now());
    assert!(row.due.is_none());

    let all = vec![task];
    let lines = render_lines(&render(&all, &all, FilterMode::All, now()));
    assert!(!lines[0].contains("due"));
}

#[test]
fn view_serializes_with_tagged_body() {
    let none: Vec<TaskRecord> = Vec::new();
    let view = render(&none, &none, FilterMode::Active, now());
    let value = serde_json::to_value(&view).expect("serialize");
    assert_eq!(value["filter"], "active");
    assert_eq!(value["body"]["kind"], "empty");
    assert_eq!(value["summary"]["active"], 0);
    assert!(matches!(view.body, ListBody::Empty { .. }));
}

#[test]
fn plain_text_lines_end_with_summary() {
    let mut done = record("01done", "Ship it", None);
    done.completed = true;
    let all = vec![record("01late", "Fix bug", Some((2, None))), done];
    let visible = visible_tasks(&all, FilterMode::All, now());
    let lines = render_lines(&render(&visible, &all, FilterMode::All, now()));

    assert_eq!(lines[0], "[ ] 01late  Fix bug  (due Mar 2, 2026) OVERDUE");
    assert_eq!(lines[1], "[x] 01done  Ship it");
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "2 tasks (1 active, 1 completed)");
}
