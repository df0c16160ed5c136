use std::path::PathBuf;

use serde_json::Value;
use tickit::error::{exit_codes, Error, ErrorKind};

#[test]
fn exit_code_validation() {
    assert_eq!(Error::EmptyText.exit_code(), exit_codes::USER_ERROR);
    assert_eq!(Error::TooLong { len: 201 }.exit_code(), exit_codes::USER_ERROR);
    let err = Error::InvalidArgument("bad input".to_string());
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn exit_code_not_found() {
    let err = Error::TaskNotFound("01abc".to_string());
    assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
    let err = Error::AmbiguousId {
        prefix: "01".to_string(),
        matches: 2,
    };
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn exit_code_persistence() {
    let err = Error::QuotaExceeded {
        key: "todoTasks".to_string(),
        size: 10,
        limit: 5,
    };
    assert_eq!(err.exit_code(), exit_codes::PERSISTENCE_FAILED);
    let err = Error::LockFailed(PathBuf::from("todoTasks.json.lock"));
    assert_eq!(err.kind().as_str(), "persistence_error");
}

#[test]
fn too_long_message_names_limit() {
    let err = Error::TooLong { len: 250 };
    assert_eq!(
        err.to_string(),
        "Task text is too long: 250 characters (maximum 200)"
    );
    let details = err.details().expect("details");
    assert_eq!(details["len"], Value::from(250));
    assert_eq!(details["max"], Value::from(200));
}

#[test]
fn not_found_carries_id_details() {
    let err = Error::TaskNotFound("01hz".to_string());
    assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("Task not found"));
    assert_eq!(
        err.details().expect("details")["id"],
        Value::String("01hz".to_string())
    );
}
