use std::fs;
use std::path::Path;

use tickit::config::Config;
use tickit::error::Error;
use tickit::filter::FilterMode;

#[test]
fn defaults_when_sections_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickit.toml");
    fs::write(&path, "").expect("write empty config");

    let cfg = Config::load(&path).expect("load");
    assert_eq!(cfg.storage.key, "todoTasks");
    assert_eq!(cfg.storage.lock_timeout_ms, 5000);
    assert_eq!(cfg.display.default_filter, FilterMode::All);
    assert_eq!(cfg.notices.ttl_ms, 3000);
    assert!(cfg.storage.dir.is_none());
}

#[test]
fn reads_all_sections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickit.toml");
    let content = r#"
[storage]
dir = "/tmp/tickit-data"
key = "work_tasks"
lock_timeout_ms = 250

[display]
default_filter = "active"

[notices]
ttl_ms = 1500
"#;
    fs::write(&path, content.trim()).expect("write config");

    let cfg = Config::load(&path).expect("load");
    assert_eq!(cfg.storage.key, "work_tasks");
    assert_eq!(cfg.storage.lock_timeout_ms, 250);
    assert_eq!(cfg.display.default_filter, FilterMode::Active);
    assert_eq!(cfg.notices.ttl_ms, 1500);
    assert_eq!(cfg.store_dir(None), Path::new("/tmp/tickit-data"));
    assert_eq!(
        cfg.store_dir(Some(Path::new("/elsewhere"))),
        Path::new("/elsewhere")
    );
}

#[test]
fn rejects_bad_storage_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickit.toml");
    fs::write(&path, "[storage]\nkey = \"../escape\"").expect("write config");

    let err = Config::load(&path).expect_err("invalid key");
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn rejects_zero_notice_ttl() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickit.toml");
    fs::write(&path, "[notices]\nttl_ms = 0").expect("write config");

    assert!(matches!(
        Config::load(&path),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn load_or_default_falls_back_on_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickit.toml");
    fs::write(&path, "[display]\ndefault_filter = \"someday\"").expect("write config");

    let cfg = Config::load_or_default(Some(&path));
    assert_eq!(cfg.display.default_filter, FilterMode::All);
    assert_eq!(cfg.storage.key, "todoTasks");
}

#[test]
fn missing_explicit_file_is_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    let err = Config::load(&path).expect_err("missing file");
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("absent.toml"));
}
