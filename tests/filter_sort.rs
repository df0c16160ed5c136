use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tickit::filter::{compare_tasks, is_overdue, visible_tasks, FilterMode};
use tickit::task::TaskRecord;

fn now() -> NaiveDateTime {
    day(2026, 4, 15).and_hms_opt(10, 0, 0).expect("now")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

fn created(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 8, minute, 0)
        .single()
        .expect("created")
}

fn task(id: &str, minute: u32, date: Option<NaiveDate>, time: Option<NaiveTime>) -> TaskRecord {
    TaskRecord::new(id, id, created(minute), date, time)
}

fn ids(tasks: &[TaskRecord]) -> Vec<&str> {
    tasks.iter().map(|task| task.id.as_str()).collect()
}

#[test]
fn overdue_then_dated_then_undated_newest_first() {
    let a = task("A", 1, Some(day(2026, 4, 14)), None);
    let b = task("B", 2, Some(day(2026, 4, 16)), None);
    let c = task("C", 3, None, None);
    let d = task("D", 4, None, None);
    let all = vec![c, a, d, b];

    let visible = visible_tasks(&all, FilterMode::All, now());
    assert_eq!(ids(&visible), vec!["A", "B", "D", "C"]);
}

#[test]
fn date_only_task_is_not_overdue_until_day_ends() {
    let today = task("T", 1, Some(day(2026, 4, 15)), None);
    assert!(!is_overdue(&today, now()));
    let late = day(2026, 4, 15).and_hms_milli_opt(23, 59, 59, 998).expect("late");
    assert!(!is_overdue(&today, late));
    let next_day = day(2026, 4, 16).and_hms_opt(0, 0, 0).expect("midnight");
    assert!(is_overdue(&today, next_day));
}

#[test]
fn timed_task_is_overdue_after_its_minute() {
    let morning = task("M", 1, Some(day(2026, 4, 15)), NaiveTime::from_hms_opt(9, 30, 0));
    assert!(is_overdue(&morning, now()));
    let evening = task("E", 1, Some(day(2026, 4, 15)), NaiveTime::from_hms_opt(18, 0, 0));
    assert!(!is_overdue(&evening, now()));
}

#[test]
fn time_without_date_never_overdue() {
    let floating = task("F", 1, None, NaiveTime::from_hms_opt(0, 1, 0));
    assert!(!is_overdue(&floating, now()));
}

#[test]
fn time_without_date_sorts_with_undated_tasks() {
    let dated = task("dated", 1, Some(day(2026, 6, 1)), None);
    let older = task("older", 2, None, None);
    let floating = task("floating", 3, None, NaiveTime::from_hms_opt(7, 0, 0));
    let newest = task("newest", 4, None, None);
    let all = vec![older, floating, dated, newest];

    let visible = visible_tasks(&all, FilterMode::All, now());
    assert_eq!(ids(&visible), vec!["dated", "newest", "floating", "older"]);
}

#[test]
fn completed_overdue_task_does_not_lead() {
    let mut done = task("done", 1, Some(day(2026, 4, 1)), None);
    done.completed = true;
    let open = task("open", 2, Some(day(2026, 4, 20)), None);
    let late = task("late", 3, Some(day(2026, 4, 10)), None);

    let visible = visible_tasks(&[open, done, late], FilterMode::All, now());
    assert_eq!(ids(&visible), vec!["late", "done", "open"]);
}

#[test]
fn same_day_timed_before_untimed_and_by_time() {
    let date = Some(day(2026, 4, 20));
    let untimed = task("untimed", 1, date, None);
    let noon = task("noon", 2, date, NaiveTime::from_hms_opt(12, 0, 0));
    let eight = task("eight", 3, date, NaiveTime::from_hms_opt(8, 0, 0));

    let visible = visible_tasks(&[untimed, noon, eight], FilterMode::All, now());
    assert_eq!(ids(&visible), vec!["eight", "noon", "untimed"]);
}

#[test]
fn ties_break_on_creation_then_id() {
    let date = Some(day(2026, 5, 1));
    let older = task("older", 1, date, None);
    let newer = task("newer", 2, date, None);
    let twin_b = task("b", 5, None, None);
    let twin_a = task("a", 5, None, None);

    let visible = visible_tasks(&[twin_b, older, twin_a, newer], FilterMode::All, now());
    assert_eq!(ids(&visible), vec!["newer", "older", "a", "b"]);
}

#[test]
fn comparator_is_consistent_both_ways() {
    let tasks = [
        task("x", 1, Some(day(2026, 4, 14)), None),
        task("y", 2, Some(day(2026, 4, 16)), NaiveTime::from_hms_opt(7, 0, 0)),
        task("z", 3, None, None),
    ];
    for left in &tasks {
        for right in &tasks {
            assert_eq!(
                compare_tasks(left, right, now()),
                compare_tasks(right, left, now()).reverse()
            );
        }
    }
}

#[test]
fn filters_select_by_completion() {
    let mut done = task("done", 1, None, None);
    done.completed = true;
    let open = task("open", 2, None, None);
    let all = vec![done, open];

    assert_eq!(ids(&visible_tasks(&all, FilterMode::Active, now())), vec!["open"]);
    assert_eq!(
        ids(&visible_tasks(&all, FilterMode::Completed, now())),
        vec!["done"]
    );
    assert_eq!(visible_tasks(&all, FilterMode::All, now()).len(), 2);
}

#[test]
fn filter_mode_parses_case_insensitively() {
    assert_eq!("Active".parse::<FilterMode>().expect("parse"), FilterMode::Active);
    assert_eq!(" completed ".parse::<FilterMode>().expect("parse"), FilterMode::Completed);
    assert!("later".parse::<FilterMode>().is_err());
    assert_eq!(FilterMode::Completed.next(), FilterMode::All);
}
